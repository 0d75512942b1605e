use mailbox_chess::ai::{AiEngine, Bot};
use mailbox_chess::config::EngineConfig;
use mailbox_chess::engine::{Color, Game};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (structured logging).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailbox_chess=info".into()),
        )
        .init();

    let config = EngineConfig::from_env();
    let mut bot = match config.seed {
        Some(seed) => Bot::seeded(seed),
        None => Bot::from_entropy(),
    };
    tracing::info!(
        engine = bot.name(),
        white = %config.white_level,
        white_depth = config.white_level.depth(),
        black = %config.black_level,
        black_depth = config.black_level.depth(),
        seed = ?config.seed,
        "mailbox-chess v{} self-play",
        env!("CARGO_PKG_VERSION")
    );
    let mut game = Game::new();

    while !game.is_game_over() && game.move_history().len() < config.max_plies {
        tokio::time::sleep(config.think_delay()).await;

        let level = match game.side_to_move() {
            Color::White => *config.white_level.level(),
            Color::Black => *config.black_level.level(),
        };

        // Search is synchronous; keep it off the async workers.
        let position = *game.position();
        let color = game.side_to_move();
        let (returned, mv) = tokio::task::spawn_blocking(move || {
            let mv = bot.choose(&position, color, &level);
            (bot, mv)
        })
        .await?;
        bot = returned;

        let Some(mv) = mv else {
            break;
        };
        let status = game.play(mv)?;
        tracing::info!(
            ply = game.move_history().len(),
            %color,
            %mv,
            %status,
            "move played"
        );
    }

    if !game.is_game_over() {
        tracing::info!(plies = config.max_plies, "ply limit reached");
    }

    println!("{}", game.position().board_string());
    println!("{}", serde_json::to_string_pretty(&game.snapshot())?);
    Ok(())
}

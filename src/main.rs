use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use seabattle::{
    init_logging, AiPlayer, EnemyTracker, Match, Phase, Player, PlayerNode, PlayerSlot, Relay,
    TcpTransport, DEFAULT_PORT,
};
use tokio::net::TcpListener;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Run an AI vs AI match locally and print the result.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
    },
    /// Run the relay coordinator.
    Relay {
        #[arg(long, help = "Bind address; defaults to 0.0.0.0 with the PORT env variable or 3000")]
        bind: Option<String>,
    },
    /// Join a relayed match with an AI player.
    Join {
        #[arg(long, default_value = "127.0.0.1:3000")]
        connect: String,
        #[arg(long, help = "Fix RNG seed for reproducible games")]
        seed: Option<u64>,
        #[arg(long, help = "AI pacing delay in milliseconds")]
        delay_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local { seed } => run_local(seed),
        Commands::Relay { bind } => {
            let bind = match bind {
                Some(bind) => bind,
                None => {
                    let port = std::env::var("PORT")
                        .ok()
                        .and_then(|p| p.parse().ok())
                        .unwrap_or(DEFAULT_PORT);
                    format!("0.0.0.0:{port}")
                }
            };
            println!("Relay listening on {bind}");
            let listener = TcpListener::bind(&bind).await?;
            Relay::new().run(listener).await
        }
        Commands::Join {
            connect,
            seed,
            delay_ms,
        } => {
            println!("Connecting to relay at {connect}...");
            let transport = TcpTransport::connect(&connect).await?;
            let player = match delay_ms {
                Some(ms) => AiPlayer::with_delay(Duration::from_millis(ms)),
                None => AiPlayer::new(),
            };
            let mut rng = seeded_rng(seed);
            let mut node = PlayerNode::new(Box::new(player), Box::new(transport));
            let outcome = node.run(&mut rng).await?;
            println!("Session ended: {outcome:?}");
            Ok(())
        }
    }
}

fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

/// AI vs AI on a single authoritative match.
fn run_local(seed: Option<u64>) -> anyhow::Result<()> {
    let mut rng0 = seeded_rng(seed);
    let mut rng1 = seeded_rng(seed.map(|s| s.wrapping_add(1)));
    let mut players = [
        AiPlayer::with_delay(Duration::ZERO),
        AiPlayer::with_delay(Duration::ZERO),
    ];
    let mut trackers = [EnemyTracker::new(), EnemyTracker::new()];

    let mut game = Match::new();
    game.set_fleet(PlayerSlot::P0, players[0].place_fleet(&mut rng0)?)?;
    game.set_fleet(PlayerSlot::P1, players[1].place_fleet(&mut rng1)?)?;
    game.start()?;

    let mut shots = 0u32;
    while !game.is_over() {
        let attacker = game.turn();
        let i = attacker.index();
        let rng = if i == 0 { &mut rng0 } else { &mut rng1 };
        let cell = players[i]
            .select_target(rng, &trackers[i])
            .ok_or_else(|| anyhow::anyhow!("no cells left to target"))?;
        let shot = game.fire(attacker, cell)?;
        trackers[i].record(cell, &shot)?;
        shots += 1;
    }

    match game.phase() {
        Phase::Over { winner: Some(slot) } => {
            println!("Game over after {shots} shots: {slot} wins")
        }
        Phase::Over { winner: None } => println!("Game over after {shots} shots: draw"),
        _ => unreachable!("loop exits only once the match is over"),
    }
    Ok(())
}

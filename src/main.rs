use anyhow::bail;
use clap::Parser;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use senet_client::{init_logging, InboundMessage, SenetClient, WaitOutcome};

/// Headless Senet client: logs in, then plays random stick throws until the
/// game ends. Useful for exercising a server without the graphical client.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Server address to connect to.
    #[arg(long, default_value = "127.0.0.1:65000")]
    connect: String,
    /// Nickname to log in with (a letter followed by letters/digits, 3-8 chars).
    #[arg(long)]
    nick: String,
    /// Fix the RNG seed for reproducible play (e.g., --seed 12345).
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_rng(&mut rand::rng()),
    };

    println!("Connecting to {}...", cli.connect);
    let mut client = SenetClient::connect(&cli.connect).await?;

    if let Some(code) = client.login(&cli.nick).await? {
        bail!("Login rejected: {}", code.describe());
    }
    println!("Logged in as {}, waiting for an opponent...", cli.nick);

    let play_first = match client.await_start_game().await? {
        InboundMessage::StartGame {
            first_nick,
            second_nick,
        } => {
            println!("Game on: {} vs {}", first_nick, second_nick);
            first_nick == cli.nick
        }
        other => bail!("Expected the game to start, got {:?}", other),
    };

    loop {
        // wait for our turn; the server is silent while the opponent plays
        let observation = client.observe_until(|m| m.is_start_turn());
        let (restored, result) = observation.join().await;
        client = restored;

        let (mut first_player, mut second_player) = match result? {
            WaitOutcome::Message(InboundMessage::StartTurn {
                first_player,
                second_player,
            }) => (first_player, second_player),
            WaitOutcome::Message(InboundMessage::EndGame { winner }) => {
                println!("Game over. Winner: {}", winner);
                break;
            }
            WaitOutcome::Message(other) => bail!("Unexpected message: {:?}", other),
            WaitOutcome::Cancelled => bail!("Observation cancelled"),
        };

        // dumb play: advance one of our stones by a stick throw and let the
        // server judge it
        let throw = rng.random_range(1..=5u8);
        let mine = if play_first {
            &mut first_player
        } else {
            &mut second_player
        };
        let stone = rng.random_range(0..mine.len());
        mine[stone] = mine[stone].saturating_add(throw).min(99);
        println!(
            "Our turn: moving stone {} forward by {} to {}",
            stone + 1,
            throw,
            mine[stone]
        );

        client.send_end_turn(&first_player, &second_player).await?;
        match client.await_turn_confirm().await? {
            InboundMessage::Ok => {}
            InboundMessage::Error { code } => {
                println!("Server rejected the turn: {}", code.describe())
            }
            InboundMessage::EndGame { winner } => {
                println!("Game over. Winner: {}", winner);
                break;
            }
            other => bail!("Unexpected message: {:?}", other),
        }
    }

    client.send_exit().await.ok();
    Ok(())
}

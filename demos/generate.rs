use clap::Parser;
use furnished::{Difficulty, GenerateConfig, generate_scenario};

#[derive(Parser)]
struct Args {
    #[clap(short, long, default_value_t = 2)]
    players: usize,
    #[clap(short, long, default_value = "medium")]
    difficulty: String,
    #[clap(short, long)]
    seed: Option<u32>,
    #[clap(long, default_value_t = 1)]
    repeats: usize,
    #[clap(long)]
    pretty: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let difficulty = match args.difficulty.as_str() {
        "easy" => Difficulty::Easy,
        "hard" => Difficulty::Hard,
        _ => Difficulty::Medium,
    };
    let mut failures = 0;
    for i in 0..args.repeats {
        let config = GenerateConfig {
            num_players: args.players.clamp(2, 4),
            difficulty,
            seed: args.seed.map(|s| s.wrapping_add(i as u32)),
            ..Default::default()
        };
        match generate_scenario(&config) {
            Ok(scenario) => {
                if scenario.satisfied_players < scenario.num_players {
                    eprintln!(
                        "warning: only {}/{} players start with a violation",
                        scenario.satisfied_players, scenario.num_players
                    );
                }
                let json = if args.pretty {
                    serde_json::to_string_pretty(&scenario)
                } else {
                    serde_json::to_string(&scenario)
                };
                match json {
                    Ok(text) => println!("{text}"),
                    Err(e) => eprintln!("Error serializing scenario: {e}"),
                }
            }
            Err(e) => {
                eprintln!("Error generating scenario: {e}");
                failures += 1;
            }
        }
    }
    if failures > 0 {
        std::process::exit(1);
    }
}

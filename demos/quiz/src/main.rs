//! quiz — a few rounds of a quiz game played by base and paid users.
//!
//! Every player is built by a factory and shares its kind's behavior set.
//! Correct answers call `increment`; paid players also top up with
//! `increaseBalance`, while their `increment` comes from the base kind.  A
//! guest with no behavior of its own is scored by borrowing `increment` via
//! `invoke_with`.
//!
//! Set `RUST_LOG=debug` to see every resolution step.

use anyhow::Result;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use dg_behavior::{BehaviorSetBuilder, Entity, invoke_with};
use dg_core::FactoryConfig;
use dg_users::kinds::{ACCOUNT_BALANCE, INCREASE_BALANCE, INCREMENT, LOGIN, NAME, SAY_NAME, SCORE};
use dg_users::{EntityFactory, QuizFactories};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:               u64 = 42;
const ROUNDS:             u32 = 5;
const ANSWER_PROBABILITY: f64 = 0.6;

// ── Config ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct QuizConfig {
    rounds:             u32,
    seed:               u64,
    /// Chance that a player answers a question correctly.
    answer_probability: f64,
    factory:            FactoryConfig,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            rounds:             ROUNDS,
            seed:               SEED,
            answer_probability: ANSWER_PROBABILITY,
            factory:            FactoryConfig::default(),
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let config = QuizConfig::default();

    println!("=== quiz — delegate entity model ===");
    println!(
        "Rounds: {}  |  Seed: {}  |  P(correct): {}",
        config.rounds, config.seed, config.answer_probability
    );
    println!();

    // 1. Factories (kinds are built once here and shared by every player).
    let quiz = QuizFactories::new(config.factory.clone())?;

    // 2. Roster.
    let mut players: Vec<Entity> = vec![
        quiz.users.create("Phil", 4)?,
        quiz.users.create("Julia", 5)?,
        quiz.paid.create("Alyssa", 8, 25)?,
        quiz.paid.create("Tim", 2, 0)?,
    ];

    // 3. A guest whose kind defines nothing.
    let guest_kind = BehaviorSetBuilder::new("guest").build()?;
    let mut guest = Entity::new(&guest_kind);
    quiz.users.init(&mut guest, "Guest", 0)?;

    for p in &mut players {
        println!("{}", p.invoke(LOGIN, &[])?);
        println!("{}", p.invoke(SAY_NAME, &[])?);
    }
    println!();

    // 4. Rounds.
    let mut rng = SmallRng::seed_from_u64(config.seed);
    for round in 1..=config.rounds {
        for p in &mut players {
            if rng.gen_bool(config.answer_probability) {
                p.invoke(INCREMENT, &[])?;
            }
            if p.responds_to(INCREASE_BALANCE) {
                p.invoke(INCREASE_BALANCE, &[])?;
            }
        }
        if rng.gen_bool(config.answer_probability) {
            invoke_with(quiz.users.kind(), INCREMENT, &mut guest, &[])?;
        }
        tracing::info!(round, "round complete");
    }

    // 5. Scoreboard.
    println!();
    println!("{:<10} {:<10} {:>6} {:>8}", "Player", "Kind", "Score", "Balance");
    println!("{}", "-".repeat(37));
    for p in players.iter().chain(std::iter::once(&guest)) {
        let balance = p
            .int_field(ACCOUNT_BALANCE)
            .map(|b| b.to_string())
            .unwrap_or_else(|_| "-".to_owned());
        println!(
            "{:<10} {:<10} {:>6} {:>8}",
            p.text_field(NAME)?,
            p.kind_name(),
            p.int_field(SCORE)?,
            balance,
        );
    }

    Ok(())
}

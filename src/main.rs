use anyhow::bail;
use clap::Parser;

use contingent::domain::mastermind::Mastermind;
use contingent::domain::numbers::Numbers;
use contingent::domain::weighing::Weighing;
use contingent::{solve, Domain, SearchConfig, Solution};

#[derive(Parser)]
#[command(name = "contingent", about = "Branching-plan solver for partially observable problems")]
struct Args {
    /// Problem to solve: weighing, mastermind, numbers, or all.
    #[arg(default_value = "all")]
    problem: String,

    /// Number of packages in the weighing problem.
    #[arg(long, default_value_t = 4)]
    packages: usize,

    /// Code length in the mastermind problem.
    #[arg(long, default_value_t = 3)]
    code_length: usize,

    /// Number of colors in the mastermind problem.
    #[arg(long, default_value_t = 2)]
    colors: u8,

    /// Longest action path the search will follow.
    #[arg(long, default_value_t = 30)]
    max_depth: usize,

    /// Belief-state expansion budget.
    #[arg(long, default_value_t = 1_000_000)]
    max_nodes: usize,

    /// Shuffle candidate actions with this seed; omit for the domain's
    /// deterministic enumeration order.
    #[arg(long)]
    seed: Option<u64>,
}

fn run<D: Domain>(name: &str, domain: &D, config: &SearchConfig) -> anyhow::Result<()> {
    let initial = domain.initial_states();
    println!("[{}] {} initial states", name, initial.len());

    match solve(domain, config) {
        Solution::Solved(plan) => {
            for line in plan.to_lines() {
                println!("{}", line);
            }
            println!("Plan found: size {} depth {}", plan.size(), plan.depth());

            // The search is sound by construction; replaying the plan from
            // every initial state catches regressions in the engine itself.
            let goals = domain.goal_states();
            for state in &initial {
                if !plan.validate(domain, state, &goals) {
                    bail!("[{}] returned plan fails validation from initial state {}", name, state);
                }
            }
            println!("Plan validated from all {} initial states", initial.len());
        }
        Solution::NoPlan => println!("No plan found"),
        Solution::OutOfBudget => {
            println!("Search ran out of budget ({} expansions); result unknown", config.max_nodes)
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = SearchConfig {
        max_depth: args.max_depth,
        max_nodes: args.max_nodes,
        shuffle_seed: args.seed,
    };

    match args.problem.as_str() {
        "weighing" => run("weighing", &Weighing::new(args.packages), &config)?,
        "mastermind" => {
            run("mastermind", &Mastermind::new(args.code_length, args.colors), &config)?
        }
        "numbers" => run("numbers", &Numbers, &config)?,
        "all" => {
            run("weighing", &Weighing::new(args.packages), &config)?;
            run("mastermind", &Mastermind::new(args.code_length, args.colors), &config)?;
            run("numbers", &Numbers, &config)?;
        }
        other => bail!("unknown problem '{}'; expected weighing, mastermind, numbers or all", other),
    }
    Ok(())
}

use clap::Parser;
use log::info;

use mtbdd::context::CompilationContext;
use mtbdd::eval::Assignment;
use mtbdd::expr::Expr;

/// Options of the product, with their price.
const OPTIONS: [(&str, i64); 5] = [
    ("premium", 50),
    ("support", 20),
    ("storage", 15),
    ("analytics", 30),
    ("sso", 25),
];

const BASE_PRICE: i64 = 100;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Selected options (comma-separated).
    #[arg(long, value_delimiter = ',', value_name = "OPTION")]
    select: Vec<String>,

    /// Maximum total price.
    #[arg(long, value_name = "INT", default_value = "180")]
    budget: i64,

    /// Write the price diagram in DOT format to this file.
    #[arg(long, value_name = "FILE")]
    dot: Option<std::path::PathBuf>,

    /// Collect garbage before reporting.
    #[arg(long)]
    gc: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let args = Cli::parse();
    println!("args = {:?}", args);

    let mut ctx = CompilationContext::new();
    ctx.auto_declare_variables(OPTIONS.iter().map(|&(name, _)| name))?;

    // price = base + sum of (option ? cost : 0)
    let price = OPTIONS.iter().fold(Expr::number(BASE_PRICE), |acc, &(name, cost)| {
        acc + Expr::ite(Expr::var(name), Expr::number(cost), Expr::number(0))
    });
    let price_fn = ctx.compile(&price)?;

    // analytics requires premium, sso requires support
    let rules = Expr::var("analytics").implies(Expr::var("premium"))
        & Expr::var("sso").implies(Expr::var("support"));
    let valid = ctx.compile(&rules)?;

    // within budget <=> !(price >= budget + 1)
    let within_budget = ctx.compile(&!Expr::threshold(price.clone(), args.budget + 1))?;
    let feasible = ctx.compile(&(rules & !Expr::threshold(price, args.budget + 1)))?;

    let mgr = ctx.mtbdd().read();
    println!("mgr = {:?}", *mgr);
    println!("price diagram: {} nodes", mgr.size(price_fn)?);
    println!("price values: {:?}", mgr.terminal_values(price_fn)?);

    let mut selection = Assignment::new();
    for &(name, _) in OPTIONS.iter() {
        selection.set(name, args.select.iter().any(|s| s == name));
    }
    let total = mgr.evaluate(price_fn, &selection)?;
    let ok = mgr.evaluate(valid, &selection)?;
    let cheap = mgr.evaluate(within_budget, &selection)?;
    println!("selection {:?}: price = {}, valid = {}, within budget = {}", args.select, total, ok, cheap);

    println!(
        "{} of {} configurations are valid and cost at most {}",
        mgr.sat_count(feasible)?,
        1u64 << OPTIONS.len(),
        args.budget
    );
    if let Some(example) = mgr.one_sat(feasible)? {
        let mut chosen: Vec<_> = example.iter().filter(|&(_, on)| on).map(|(name, _)| name).collect();
        chosen.sort_unstable();
        println!("for example: {:?}", chosen);
    }

    let bytes = mgr.serialize(&[price_fn, feasible])?;
    println!("serialized price and feasibility in {} bytes", bytes.len());

    if let Some(path) = &args.dot {
        std::fs::write(path, mgr.to_dot(&[price_fn])?)?;
        println!("wrote {}", path.display());
    }
    drop(mgr);

    if args.gc {
        ctx.clear_cache();
        let mut mgr = ctx.mtbdd().write();
        mgr.retain(price_fn)?;
        let freed = mgr.collect_garbage();
        info!("kept price function, freed {} nodes", freed);
        println!("stats after gc: {:?}", mgr.memory_stats());
        mgr.release(price_fn);
    }

    Ok(())
}

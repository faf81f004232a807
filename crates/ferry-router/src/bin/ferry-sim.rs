//! Ferry simulation driver
//!
//! Feeds random encounters between a fixed population of nodes through a
//! [`Router`] and reports what the nodes learned.
//!
//! ```text
//! ferry-sim [--steps N] [--export PATH] [--json]
//! ```
//!
//! Parameters come from `FERRY_*` environment variables; see
//! [`RouterConfig::from_env`].

use ferry_router::{NodeId, Router, RouterConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Args {
    steps: u64,
    export: Option<String>,
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        steps: 500,
        export: None,
        json: false,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--steps" => {
                let raw = iter.next().ok_or("--steps needs a value")?;
                args.steps = raw
                    .parse()
                    .map_err(|_| format!("invalid --steps value: {raw}"))?;
            }
            "--export" => {
                args.export = Some(iter.next().ok_or("--export needs a path")?);
            }
            "--json" => args.json = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferry=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = parse_args().map_err(|e| {
        eprintln!("Usage: ferry-sim [--steps N] [--export PATH] [--json]");
        e
    })?;

    let config = RouterConfig::from_env()?;
    let total = config.total_nodes as u64;
    let mut rng = StdRng::seed_from_u64(config.seed);

    tracing::info!(
        "Starting simulation: {} nodes, {} encounters, seed {}",
        total,
        args.steps,
        config.seed
    );

    if total < 2 {
        return Err("at least two nodes are needed for an encounter".into());
    }
    let router = Router::with_nodes(config, (0..total).map(NodeId))?;

    let mut now = 0.0;
    let mut learned = 0u64;
    let mut copies = 0u64;
    let mut aged = 0usize;

    for step in 0..args.steps {
        let host = NodeId(rng.gen_range(0..total));
        let mut neighbor = NodeId(rng.gen_range(0..total));
        while neighbor == host {
            neighbor = NodeId(rng.gen_range(0..total));
        }

        // Battery and buffer drift between encounters.
        let energy = rng.gen_range(50.0..500.0);
        let buffer = rng.gen_range(0..10 * 1024 * 1024);
        router.set_resources(neighbor, energy, buffer)?;

        let outcome = router.connection_up(host, neighbor, now)?;
        learned += u64::from(outcome.host.learned) + u64::from(outcome.neighbor.learned);

        let decision = router.replicas(host, neighbor, now, &mut rng)?;
        copies += u64::from(decision.copies);

        let message = format!("M{step}");
        router.message(host, &message, rng.gen_range(0.0..240.0), rng.gen_range(0..12))?;

        let session = rng.gen_range(10.0..300.0);
        router.connection_down(host, neighbor, now + session)?;

        now += session + rng.gen_range(1.0..60.0);
        aged += router.tick(now);
    }

    tracing::info!(
        "Done at t={:.0}s: {} gated updates, {} aged neighbors, {:.1} copies per encounter",
        now,
        learned,
        aged,
        copies as f64 / args.steps.max(1) as f64
    );

    if let Some(path) = &args.export {
        router.export_tables(path)?;
    }

    if args.json {
        println!("{}", router.snapshot().to_json()?);
    }

    Ok(())
}

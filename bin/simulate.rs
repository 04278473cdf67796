use clmm_engine::scenario::Scenario;

fn usage() -> ! {
    eprintln!("usage: simulate <scenario.json>");
    std::process::exit(1);
}

fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 2 {
        usage();
    }

    let json = match std::fs::read_to_string(&args[1]) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("failed to read {}: {}", args[1], err);
            std::process::exit(1);
        }
    };

    let scenario = match Scenario::from_json(&json) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("invalid scenario {}: {}", args[1], err);
            std::process::exit(1);
        }
    };

    let report = match scenario.run() {
        Ok(report) => report,
        Err(err) => {
            eprintln!("failed to create pool: {}", err);
            std::process::exit(2);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("failed to encode report: {}", err);
            std::process::exit(2);
        }
    }

    match &report.invariant_violation {
        None => eprintln!("invariants: ok"),
        Some(violation) => {
            eprintln!("invariants: violated: {}", violation);
            std::process::exit(3);
        }
    }
}

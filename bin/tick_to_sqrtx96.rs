use clmm_engine::libraries::tick_math::TickMath;

fn usage() -> ! {
    eprintln!("usage: tick_to_sqrtx96 <tick>");
    std::process::exit(1);
}

fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 2 {
        usage();
    }

    let Ok(tick) = args[1].parse::<i32>() else {
        usage();
    };

    match TickMath::get_sqrt_ratio_at_tick(tick) {
        Ok(sqrt_x96) => println!("sqrt_x96 price for tick {} is {}", tick, sqrt_x96),
        Err(err) => {
            eprintln!("tick {} has no price: {:?}", tick, err);
            std::process::exit(2);
        }
    }
}

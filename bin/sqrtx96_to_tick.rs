use clmm_engine::libraries::tick_math::TickMath;
use ethnum::U256;

fn usage() -> ! {
    eprintln!("usage: sqrtx96_to_tick <sqrt_price_x96>");
    std::process::exit(1);
}

fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 2 {
        usage();
    }

    let Ok(sqrt_x96) = U256::from_str_radix(&args[1], 10_u32) else {
        usage();
    };

    match TickMath::get_tick_at_sqrt_ratio(sqrt_x96) {
        Ok(tick) => println!("tick for sqrt_x96 price {} is {}", sqrt_x96, tick),
        Err(err) => {
            eprintln!("sqrt_x96 price {} has no tick: {:?}", sqrt_x96, err);
            std::process::exit(2);
        }
    }
}

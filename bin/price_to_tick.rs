use clmm_engine::libraries::{
    safe_cast::big_uint_to_u256, tick_bitmap::compress, tick_math::TickMath,
};
use num_bigint::ToBigUint;

// we have 2 args, price and tick_spacing

fn usage() -> ! {
    eprintln!("usage: price_to_tick <price> <tick_spacing>");
    std::process::exit(1);
}

fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 3 {
        usage();
    }

    let Ok(price) = args[1].parse::<f64>() else {
        usage();
    };
    let Some(tick_spacing) = args[2].parse::<i32>().ok().filter(|spacing| *spacing > 0) else {
        usage();
    };

    let q_96 = 2_f64.powi(96);
    let sqrtx96_floating = price.sqrt() * q_96;

    let Some(sqrtx96_u256) = sqrtx96_floating
        .to_biguint()
        .and_then(|value| big_uint_to_u256(&value))
    else {
        eprintln!("price {} does not map to a sqrt_x96 price", price);
        std::process::exit(2);
    };

    let tick_not_aligned = match TickMath::get_tick_at_sqrt_ratio(sqrtx96_u256) {
        Ok(tick) => tick,
        Err(err) => {
            eprintln!("price {} is outside the tick range: {:?}", price, err);
            std::process::exit(2);
        }
    };

    // align down to the nearest usable tick
    let tick = compress(tick_not_aligned, tick_spacing) * tick_spacing;

    println!(
        "tick for price {} is {} and not_aligned tick is {}",
        price, tick, tick_not_aligned
    );
}

use newton_plus::{is_sqrt, isqrt, parse_operand, select_tier};
use std::io::{self, BufRead};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let operands: Vec<String> = if args.is_empty() {
        tracing::debug!("No operands on the command line, reading stdin.");
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .filter(|line| !line.trim().is_empty())
            .collect()
    } else {
        args
    };

    for raw in &operands {
        let x = parse_operand(raw)?;
        let root = isqrt(&x)?;
        tracing::debug!(bits = x.bits(), tier = ?select_tier(x.magnitude()), "Computed root");

        if !is_sqrt(&x, &root) {
            tracing::error!(%x, %root, "Root failed verification");
            return Err(format!("isqrt({}) returned {}, which is not the floor root", x, root).into());
        }
        println!("{}", root);
    }

    tracing::info!("Computed {} square roots.", operands.len());
    Ok(())
}

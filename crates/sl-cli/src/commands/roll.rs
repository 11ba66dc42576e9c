use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sl_mechanics::DiceNotation;

pub fn run(notation: &str, seed: Option<u64>, strict: bool) -> Result<(), String> {
    if strict {
        DiceNotation::parse_strict(notation).map_err(|e| e.to_string())?;
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let result = sl_mechanics::roll(notation, None, &mut rng);

    println!("  {result}");
    if result.defaulted {
        println!("  {}", "Unrecognised notation; rolled 1d20.".yellow());
    }
    Ok(())
}

use ThermoDivU::Examples::closed_chamber_examples::closed_chamber_examples;
use ThermoDivU::settings::SolverConfig;

pub fn main() {
    // usage: ThermoDivU [task] [config.json]
    // 0: enclosed vortex, 1: heated closed box
    let mut args = std::env::args().skip(1);
    let task: usize = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(1);
    let path = args.next().unwrap_or_else(|| "thermo_divu.json".to_string());
    let config = SolverConfig::load(&path).unwrap();
    closed_chamber_examples(task, config);
}

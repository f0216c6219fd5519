use statevec_sim::{
    SimResult,
    circuit::QaoaCircuit,
    cost::{ Adjacency, CostFunction },
    register::{ Init, QubitRegister },
};

const STEPS: usize = 24;
const SHOTS: usize = 2000;

fn print_histogram(bins: &[f64]) {
    for (c, p) in bins.iter().enumerate() {
        let bar = "#".repeat((p * 60.0).round() as usize);
        println!("  cut {:>2}: {:.4} {}", c, p, bar);
    }
}

fn main() -> SimResult<()> {
    // 6-vertex graph: a ring with two chords
    let adj = Adjacency::from_rows(&[
        [0_u8, 1, 0, 1, 0, 1],
        [1, 0, 1, 0, 0, 0],
        [0, 1, 0, 1, 1, 0],
        [1, 0, 1, 0, 1, 0],
        [0, 0, 1, 1, 0, 1],
        [1, 0, 0, 0, 1, 0],
    ])?;
    println!("edges: {:?}", adj.edges());
    let (cost, max_cut) = CostFunction::max_cut(&adj);
    println!("max cut = {}", max_cut);
    println!("cost observable: {}", adj.cut_observable()?);

    let n = cost.num_qubits();
    let mut uniform = QubitRegister::new(n, Init::Basis(0), Some(0))?;
    for k in 0..n { uniform.apply_h(k)?; }
    println!("uniform superposition, ⟨C⟩ = {:.5}", cost.expectation(&uniform)?);
    print_histogram(&cost.histogram(&uniform, max_cut)?);

    let circuit = QaoaCircuit::new(cost, 1)?;
    let best = circuit.grid_search(STEPS)?;
    println!(
        "best of {}x{} grid: γ = {:.4}, β = {:.4}, ⟨C⟩ = {:.5} (ratio {:.4})",
        STEPS, STEPS, best.gamma, best.beta, best.value,
        best.value / max_cut as f64,
    );

    let mut reg = circuit.run(&[best.gamma, best.beta], Some(12345))?;
    println!("QAOA p=1 state:");
    print_histogram(&circuit.cost().histogram(&reg, max_cut)?);

    let counts = reg.sample(SHOTS)?;
    let hits: usize
        = counts.iter()
        .filter(|(k, _)| circuit.cost().values()[**k] == max_cut as f64)
        .map(|(_, c)| *c)
        .sum();
    println!(
        "{} of {} samples hit a maximum cut ({:.1}%)",
        hits, SHOTS, 100.0 * hits as f64 / SHOTS as f64,
    );
    Ok(())
}

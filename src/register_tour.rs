use rand::{ rngs::StdRng, Rng, SeedableRng };
use statevec_sim::{
    SimResult,
    gate::{ self, Gate },
    measure::Outcome,
    pauli::{ PauliString, PauliSum },
    register::{ Init, QubitRegister },
};

fn print_state(reg: &QubitRegister) {
    let n = reg.num_qubits();
    for (k, a) in reg.amplitudes().iter().enumerate() {
        if a.norm_sqr() < 1e-12 { continue; }
        println!("  ∣{:0w$b}⟩  {:+.5}{:+.5}i", k, a.re, a.im, w = n);
    }
}

fn main() -> SimResult<()> {
    let mut rng = StdRng::seed_from_u64(10101);

    // |0000⟩ -> X on 0, H on 1..3, CNOT(2 -> 1)
    let mut reg = QubitRegister::new(4, Init::Basis(0), Some(7777))?;
    reg.apply_x(0)?;
    (1..4).try_for_each(|k| reg.apply_h(k).map(|_| ()))?;
    reg.apply_cnot(2, 1)?;
    println!("after X0, H1..3, CNOT(2, 1):");
    print_state(&reg);
    for k in 0..4 {
        println!("  P(q{} = 1) = {:.6}", k, reg.probability(k)?);
    }

    // caller-side draw, then an explicit collapse
    let p1 = reg.probability(1)?;
    let outcome = Outcome::from(rng.gen::<f64>() < p1);
    reg.collapse(1, outcome)?;
    println!("collapsed q1 onto {}; squared norm = {:.6}", outcome, reg.norm_sqr());
    reg.normalize()?;
    println!("renormalized; P(q1 = 1) = {:.6}", reg.probability(1)?);

    // the register's own generator
    let outcome = reg.measure(3)?;
    println!("measured q3 = {}", outcome);
    print_state(&reg);

    // |+,-,0,1⟩
    reg.initialize(Init::Basis(0b1010))?;
    reg.apply_h(0)?.apply_h(1)?;
    let x0 = PauliString::from_codes(&[0], &[1], 1.0)?;
    let x0z3 = PauliString::from_codes(&[0, 3], &[1, 3], 1.0)?;
    let x1 = PauliString::from_codes(&[1], &[1], 1.0)?;
    println!("state ∣+,-,0,1⟩:");
    print_state(&reg);
    println!("  ⟨{}⟩ = {:+.6}", x0, reg.expectation(&x0)?);
    println!("  ⟨{}⟩ = {:+.6}", x0z3, reg.expectation(&x0z3)?);
    println!("  ⟨{}⟩ = {:+.6}", x1, reg.expectation(&x1)?);

    // Bell pair and a sum of Pauli strings
    let mut bell = QubitRegister::new(2, Init::Basis(0), Some(1))?;
    bell.apply_h(0)?.apply_cnot(0, 1)?;
    let obs: PauliSum
        = [1, 2, 3].iter()
        .map(|c| PauliString::from_codes(&[0, 1], &[*c, *c], 1.0))
        .collect::<SimResult<_>>()?;
    println!("Bell pair: ⟨{}⟩ = {:+.6}", obs, bell.expectation_sum(&obs)?);

    // random circuit undone by its inverse
    let orig = QubitRegister::new(5, Init::Random, Some(2024))?;
    let mut work = orig.clone();
    let mut circuit: Vec<Gate>
        = (0..30).map(|j| Gate::sample_single(j % 5, &mut rng)).collect();
    circuit.push(Gate::CU(0, 4, gate::yrot(0.3)));
    circuit.push(Gate::Swap(1, 3));
    work.apply_circuit(&circuit)?;
    let inverse: Vec<Gate> = circuit.iter().rev().map(|g| g.inverse()).collect();
    work.apply_circuit(&inverse)?;
    println!("fidelity after circuit + inverse = {:.12}", work.fidelity(&orig)?);

    let counts = work.sample(1000)?;
    let top = counts.iter().max_by_key(|(_, c)| **c);
    if let Some((k, c)) = top {
        println!("most frequent of 1000 samples: ∣{:05b}⟩ ({} times)", k, c);
    }
    Ok(())
}

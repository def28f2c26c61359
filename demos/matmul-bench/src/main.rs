//! Matrix multiply benchmark.
//!
//! Boot-to-completion run: builds the canonical identity and all-ones
//! operands, drives the software, hardware-offload, and parallel engines
//! in turn, and reports a result sample plus elapsed seconds for each.

use std::error::Error;
use std::process;

use engine::{multiply_offload, multiply_software};
use mac::SoftMac;
use matmul_bench::{run_parallel, ticks_to_secs, time, Timebase, WallClock, DIM, WORKER_THREADS};
use matrix::Matrix;

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        eprintln!("fatal: {error}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("matrix multiply benchmark: {DIM}x{DIM}, identity * ones");
    let clock = WallClock::new();

    let a = Matrix::identity(DIM)?;
    let b = Matrix::ones(DIM)?;

    let (software, software_ticks) = time(&clock, || multiply_software(&a, &b));
    let software = software?;
    report(&clock, "software", &software, software_ticks);

    let mut regs = SoftMac::new();
    let (offload, offload_ticks) = time(&clock, || multiply_offload(&a, &b, &mut regs));
    let offload = offload?;
    report(&clock, "hardware", &offload, offload_ticks);

    let (par, parallel_ticks) = time(&clock, || run_parallel(a.clone(), b.clone()));
    let par = par?;
    log::debug!("parallel run used {WORKER_THREADS} scheduler threads");
    report(&clock, "parallel", &par, parallel_ticks);

    log::trace!("parallel result:\n{par}");

    if offload == software {
        println!("verification: PASSED (software == hardware)");
    } else {
        println!("verification: FAILED (software != hardware)");
    }
    if par == software {
        println!("verification: PASSED (parallel == software)");
    } else {
        println!("verification: FAILED (parallel != software)");
    }

    Ok(())
}

fn report(clock: &WallClock, name: &str, result: &Matrix, ticks: u64) {
    println!(
        "{name}: C[0][0..4] = [{:.3}, {:.3}, {:.3}, {:.3}], checksum {:.3}",
        result[(0, 0)],
        result[(0, 1)],
        result[(0, 2)],
        result[(0, 3)],
        result.checksum()
    );
    println!(
        "{name} time: {:.9} s",
        ticks_to_secs(ticks, clock.frequency())
    );
}

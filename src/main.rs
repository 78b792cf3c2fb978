use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::info;

use pagesim::{input, AccessRecord, FramePool, PageTable, Simulation};

mod cli;
use cli::Cli;

fn main() -> ExitCode {
    let args = Cli::parse();

    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pagesim: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Cli) -> pagesim::Result<()> {
    /**********STRUCTURE DECLARATION**********/
    let page_table = match &args.table {
        Some(path) => input::load_page_table(path)?,
        None => PageTable::new(args.pages)?,
    };

    let frame_pool = match &args.pool {
        Some(frames) => FramePool::from_frames(frames.iter().copied())?,
        None => FramePool::unheld(args.frames, &page_table)?,
    };

    info!(
        "{} pages, {} free frames, {} replacement",
        page_table.len(),
        frame_pool.len(),
        args.pra
    );
    let mut sim = Simulation::new(args.pra, page_table, frame_pool)?;

    /**********FILE PARSING**********/
    let references = input::load_reference_string(&args.file)?;

    /**********RUNNING SIMULATOR**********/
    if args.trace {
        for &pn in references.pages() {
            let access = sim.access(pn)?;
            println!("{}", AccessRecord { pn, access });
        }
    } else {
        sim.run(&references)?;
    }

    print_statistics(&sim, args.debug);
    Ok(())
}

/* HELPER FUNCTIONS */
fn print_statistics(sim: &Simulation, debug: bool) {
    let references = sim.references();
    if debug {
        print_page_table(sim.page_table());
        println!("Free Frames = {:?}", sim.frame_pool().frames());
        println!("***********************************");
    }
    println!("Replacement Algorithm = {}", sim.algorithm());
    println!("Number of References = {}", references);
    println!("Page Faults = {}", sim.page_faults());
    if references > 0 {
        println!(
            "Page Fault Rate = {:.3}",
            sim.page_faults() as f64 / references as f64,
        );
    }
    println!("Hits = {}", sim.hits());
    println!("Evictions = {}", sim.evictions());
}

fn print_page_table(page_table: &PageTable) {
    for (pn, entry) in page_table.entries().iter().enumerate() {
        let frame = entry
            .frame_number()
            .map_or_else(|| "-".to_string(), |frame| frame.to_string());
        println!(
            "Page: {} IV: {} FN: {} ATS: {} LATS: {} RC: {}",
            pn,
            entry.is_valid() as u8,
            frame,
            entry.arrival_timestamp(),
            entry.last_access_timestamp(),
            entry.reference_count()
        );
    }
}

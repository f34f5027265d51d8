use std::process::ExitCode;

use burn::{backend::Autodiff, config::Config};
use clap::Parser;
use gol_learn::{
    args::{self, Args},
    error::GolResult,
    render::{ConsoleCostLogger, TerminalRenderer},
    session::{BoardRenderer, Session},
};

#[cfg(feature = "cuda")]
type Backend = Autodiff<burn::backend::Cuda>;
#[cfg(not(feature = "cuda"))]
type Backend = Autodiff<burn::backend::NdArray>;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("gol_learn=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> GolResult<()> {
    let config = args.training_config()?;
    if let Some(path) = &args.save_config {
        config.save(path)?;
        tracing::info!(path = %path.display(), "configuration saved");
    }

    // Read the board before training so a bad file fails fast.
    let board = args
        .input_file
        .as_ref()
        .map(|path| args::import_board(path, args.alive_symbol))
        .transpose()?;

    let device = Default::default();
    let mut session = Session::<Backend>::new(config, &device)?;
    let mut renderer = TerminalRenderer::new(std::io::stdout());
    let mut logger = ConsoleCostLogger::new(std::io::stdout());

    for _ in 0..args.sequences {
        session.add_sequence(&mut renderer)?;
    }

    session.on_train_requested(args.steps, args.sample_every, &mut logger)?;
    session.predict_sequences(&mut renderer)?;

    if let Some(board) = board {
        let prediction = session.on_predict_requested(&board)?;
        renderer.render(&board, "Input")?;
        renderer.render(&prediction, "Prediction")?;
    }

    Ok(())
}

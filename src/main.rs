use clap::Parser;
use env_logger::Env;
use mockshot::cli::Cli;
use mockshot::ExportJob;

fn run(cli: Cli) -> mockshot::Result<Vec<mockshot::ExportedImage>> {
    let (request, config) = cli.into_parts();
    let cwd = std::env::current_dir().map_err(|e| mockshot::Error::Io {
        path: ".".into(),
        source: e,
    })?;
    let job = ExportJob::resolve(request, &cwd)?;
    mockshot::export(&job, &config)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Help, missing input and malformed flags exit here, before any browser work.
    let cli = Cli::parse();

    match run(cli) {
        Ok(images) => {
            for image in images {
                println!("{}", image);
            }
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

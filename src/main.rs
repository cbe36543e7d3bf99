use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let args = mnf::cli::parse();
    app::run(args)
}

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();

    let app = workbench::default();
    app.run();

    Ok(())
}

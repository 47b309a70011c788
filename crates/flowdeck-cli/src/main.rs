mod cli;

use flowdeck_tui::KeyReadTimeout;

fn main() {
    match cli::run() {
        Ok(cli::Outcome::Accepted) => {}
        Ok(cli::Outcome::Declined) => std::process::exit(1),
        Ok(cli::Outcome::Exited(code)) => std::process::exit(code),
        Err(e) => {
            eprintln!("{e:#}"); // pretty anyhow chain
            if e.downcast_ref::<KeyReadTimeout>().is_some() {
                std::process::exit(124);
            }
            std::process::exit(1);
        }
    }
}

use colored::Colorize;

fn main() {
    if let Err(e) = condition_editor::run() {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

//! OxiGz CLI - parallel gzip compression.

fn main() {
    std::process::exit(oxigz_cli::call(std::env::args_os()));
}

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_to_file_by_default() {
        let cli = Cli::try_parse_from(["emuy-tools-client"]).unwrap();
        assert!(!cli.is_to_std_out);
    }

    #[test]
    fn short_flag_switches_to_stdout() {
        let cli = Cli::try_parse_from(["emuy-tools-client", "-s"]).unwrap();
        assert!(cli.is_to_std_out);
    }
}

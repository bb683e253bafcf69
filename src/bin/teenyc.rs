use structopt::StructOpt;
use teeny::cli::command;

fn main() {
    command::terminal_init();
    command::compile_only(command::SubcommandCompile::from_args());
}

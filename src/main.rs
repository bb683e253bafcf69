use structopt::StructOpt;
use teeny::cli::command;

fn main() {
    command::terminal_init();
    command::root(command::CommandRoot::from_args());
}

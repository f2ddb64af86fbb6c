#![warn(clippy::all)]

use structopt::StructOpt;

use cfsubmit::{Console, ConsoleConfig, Opt, Result};

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let conf = ConsoleConfig {
        assume_yes: opt.global_opt().assume_yes,
    };
    let cnsl = &mut if opt.global_opt().quiet {
        Console::sink(conf)
    } else {
        Console::term(conf)
    };
    opt.run(cnsl)
}

#![deny(warnings)]

use std::{
    error::Error,
    io::{self, Write},
};

mod app;
pub(crate) use app::App;

mod cmds;
mod logging;

#[cfg(test)]
mod temp_cwd;

pub(crate) type Result<T> = std::result::Result<T, Box<dyn Error>>;

#[allow(unused_must_use)]
#[cfg(not(tarpaulin_include))]
fn main() {
    // Keep this function small. Everything it calls is reachable from the
    // in-process tests, but `main` itself is not.

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    let arg_matches = app::clap_app().get_matches();
    logging::init(app::verbosity(&arg_matches));

    let mut app = App {
        arg_matches,
        stdout: &mut stdout,
    };

    let r = app.run();

    app.flush();
    // Intentionally ignoring the result of this flush.

    std::process::exit(match r {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            1
        }
    });
}

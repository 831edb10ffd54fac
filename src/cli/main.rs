//-
// Copyright (c) 2026, the Maildrop authors
//
// This file is part of Maildrop.
//
// Maildrop is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free
// Software Foundation, either version 3 of the License, or (at your option)
// any later version.
//
// Maildrop is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Maildrop. If not, see <http://www.gnu.org/licenses/>.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use structopt::StructOpt;

use maildrop::mailbox::{Maildir, MaildirConfig};
use maildrop::model::Msgnum;
use maildrop::support::error::Error;
use maildrop::support::sysexits::*;

/// Inspect and expunge a single maildir mailbox.
///
/// Opening the mailbox migrates anything pending under new/ into cur/, so
/// even read-only subcommands modify the directory the way a mail reader
/// would.
#[derive(StructOpt)]
#[structopt(max_term_width = 80)]
struct Command {
    #[structopt(flatten)]
    common: CommonOptions,

    #[structopt(subcommand)]
    sub: Subcommand,
}

#[derive(StructOpt)]
struct CommonOptions {
    /// The maildir root (the directory containing cur/ and new/).
    #[structopt(short, long, parse(from_os_str))]
    maildir: PathBuf,

    /// Optional TOML configuration file.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Log filesystem traffic to stderr.
    #[structopt(long)]
    debug: bool,
}

#[derive(StructOpt)]
enum Subcommand {
    /// List the messages in the mailbox.
    List,
    /// Print the content of one message to standard output.
    Cat {
        #[structopt(parse(try_from_str))]
        msgnum: Msgnum,
    },
    /// Delete the given messages and flush the deletions to disk.
    Purge {
        #[structopt(parse(try_from_str), required = true)]
        msgnums: Vec<Msgnum>,
    },
}

pub fn main() {
    let cmd = Command::from_args();

    let mut config = load_config(&cmd.common);
    if cmd.common.debug {
        config.debug = true;
    }
    init_log(config.debug);

    let mut mailbox = match Maildir::open(&cmd.common.maildir, config) {
        Ok(mailbox) => mailbox,
        Err(e @ Error::NotAMaildir) => {
            die!(EX_DATAERR, "{}: {}", cmd.common.maildir.display(), e)
        }
        Err(e) => die!(
            EX_NOINPUT,
            "Unable to open {}: {}",
            cmd.common.maildir.display(),
            e
        ),
    };

    match cmd.sub {
        Subcommand::List => list(&mailbox),
        Subcommand::Cat { msgnum } => cat(&mailbox, msgnum),
        Subcommand::Purge { msgnums } => purge(&mut mailbox, &msgnums),
    }
}

fn list(mailbox: &Maildir) {
    let catalog = match mailbox.working_catalog() {
        Ok(catalog) => catalog,
        Err(e) => die!(EX_SOFTWARE, "{}", e),
    };

    println!(
        "{} messages, {} bytes",
        catalog.count(),
        catalog.total_size()
    );
    for msgnum in catalog.msgnums() {
        if let (Some(size), Some(path)) =
            (catalog.size_of(msgnum), catalog.filename_of(msgnum))
        {
            println!("{:>6} {:>10} {}", msgnum, size, path.display());
        }
    }
}

fn cat(mailbox: &Maildir, msgnum: Msgnum) {
    match mailbox.fetch(msgnum) {
        Ok(fetched) => {
            let stdout = io::stdout();
            let mut stdout = stdout.lock();
            if let Err(e) = stdout.write_all(fetched.content.as_bytes()) {
                die!(EX_IOERR, "Failed to write message: {}", e);
            }
        }
        Err(e @ Error::NxMessage) => {
            die!(EX_DATAERR, "Message {}: {}", msgnum, e)
        }
        Err(e) => {
            die!(EX_UNAVAILABLE, "Unable to read message {}: {}", msgnum, e)
        }
    }
}

fn purge(mailbox: &mut Maildir, msgnums: &[Msgnum]) {
    for &msgnum in msgnums {
        if let Err(e) = mailbox.delete(msgnum) {
            die!(EX_DATAERR, "Message {}: {}", msgnum, e);
        }
    }

    if let Err(e) = mailbox.flush(None) {
        die!(EX_IOERR, "Failed to flush deletions: {}", e);
    }

    println!("Expunged {} messages", msgnums.len());
}

fn load_config(common: &CommonOptions) -> MaildirConfig {
    let path = match common.config {
        None => return MaildirConfig::default(),
        Some(ref path) => path,
    };

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            die!(EX_CONFIG, "Unable to read {}: {}", path.display(), e)
        }
    };
    match toml::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            die!(EX_CONFIG, "Unable to parse {}: {}", path.display(), e)
        }
    }
}

fn init_log(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message,
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
        .expect("Failed to initialise logging");
}

//! One connected session: the channel, the greeting, and the most recent
//! listing live here instead of in process globals.

use crate::channel::LineChannel;
use crate::error::Result;
use crate::listing::{self, Listing};
use crate::net;
use crate::protocol::{CMD_QUIT, MAX_LINE};
use crate::transfer::{self, FetchOutcome, TransferObserver};
use std::net::TcpStream;
use std::path::Path;

/// Per-file result of a fetch-all pass.
pub struct FetchReport {
    pub name: String,
    pub result: Result<FetchOutcome>,
}

pub struct Session {
    chan: LineChannel<TcpStream>,
    greeting: String,
    listing: Option<Listing>,
}

impl Session {
    /// Connect and complete the greeting handshake. The server speaks
    /// first; a stream that closes before one greeting line arrives fails
    /// construction, which is fatal to the run.
    pub fn connect(host: &str, port: u16) -> Result<Self> {
        let stream = net::connect(host, port)?;
        let mut chan = LineChannel::new(stream);
        let greeting = chan.read_line(MAX_LINE)?;
        Ok(Self {
            chan,
            greeting,
            listing: None,
        })
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Fetch a fresh listing from the server, replacing the stored one.
    pub fn refresh_listing(&mut self) -> Result<&Listing> {
        let fresh = listing::list(&mut self.chan)?;
        Ok(&*self.listing.insert(fresh))
    }

    /// The listing from the last successful `refresh_listing`, if any.
    pub fn listing(&self) -> Option<&Listing> {
        self.listing.as_ref()
    }

    pub fn fetch(
        &mut self,
        name: &str,
        dest_dir: &Path,
        confirm_overwrite: &mut dyn FnMut(&str) -> bool,
        observer: &mut dyn TransferObserver,
    ) -> Result<FetchOutcome> {
        transfer::fetch(&mut self.chan, name, dest_dir, confirm_overwrite, observer)
    }

    /// Fetch every retained entry of the stored listing, in listing order,
    /// each independently: one file's failure never stops the rest. With no
    /// stored listing this is a no-op returning an empty report list — the
    /// menu layer turns that into a user error.
    pub fn fetch_all(
        &mut self,
        dest_dir: &Path,
        confirm_overwrite: &mut dyn FnMut(&str) -> bool,
        observer: &mut dyn TransferObserver,
    ) -> Vec<FetchReport> {
        let names: Vec<String> = self
            .listing
            .as_ref()
            .map(|l| l.entries().iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default();
        names
            .into_iter()
            .map(|name| {
                let result = transfer::fetch(
                    &mut self.chan,
                    &name,
                    dest_dir,
                    &mut *confirm_overwrite,
                    &mut *observer,
                );
                FetchReport { name, result }
            })
            .collect()
    }

    /// Send `QUIT` and read the farewell line if the server offers one.
    /// Both steps are best-effort; consuming `self` closes the connection
    /// either way.
    pub fn quit(mut self) -> Option<String> {
        if self.chan.send_line(CMD_QUIT).is_err() {
            return None;
        }
        self.chan.read_line(MAX_LINE).ok()
    }
}

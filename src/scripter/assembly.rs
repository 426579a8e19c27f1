//! Script assembly
//!
//! Output is a sequence of batches, each terminated by a `GO` line and a
//! blank line. Related objects are written in sections, one batch per
//! section, with an optional banner comment.

use crate::config::{ScripterOptions, BATCH_SEPARATOR};
use crate::error::Result;
use crate::model::{Login, ScriptObject, Section};
use crate::quoting::quotename;

const BANNER_WIDTH: usize = 80;

pub(crate) struct ScriptWriter<'a> {
    options: &'a ScripterOptions,
    out: String,
}

impl<'a> ScriptWriter<'a> {
    pub fn new(options: &'a ScripterOptions) -> Self {
        Self {
            options,
            out: String::new(),
        }
    }

    /// `USE [db];` when a database is configured and `include_use` is set.
    pub fn preamble(&mut self) {
        if !self.options.include_use {
            return;
        }
        if let Some(database) = &self.options.database {
            let statement = format!("USE {};", quotename(database));
            self.batch(&statement);
        }
    }

    /// Drop, definition and related sections of one object.
    ///
    /// The body is rendered before anything is written, so a failure leaves
    /// the writer untouched.
    pub fn object(&mut self, object: &ScriptObject) -> Result<()> {
        let body = object.body.script()?;

        if self.options.include_drop {
            self.batch(&object.object.drop_script());
        }
        self.batch(&body);

        for section in object.related.sections() {
            self.section(&section);
        }
        Ok(())
    }

    pub fn login(&mut self, login: &Login) -> Result<()> {
        let script = login.script(self.options.server_role_syntax)?;
        if self.options.include_drop {
            self.batch(&login.drop_script());
        }
        self.batch(&script);
        Ok(())
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn section(&mut self, section: &Section) {
        if section.statements.is_empty() {
            return;
        }
        if self.options.comment_scripts {
            self.out.push_str(&"-".repeat(BANNER_WIDTH));
            self.out.push('\n');
            self.out.push_str(&format!("-- {}\n--\n", section.title));
        }
        for statement in &section.statements {
            self.out.push_str(statement);
            self.out.push('\n');
        }
        self.separator();
    }

    fn batch(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
        self.separator();
    }

    fn separator(&mut self) {
        self.out.push_str(BATCH_SEPARATOR);
        self.out.push_str("\n\n");
    }
}

// 🖥️ Interactive session - read a command, run it, repeat
//
// Recoverable errors are reported and the loop continues.
// The catalog is saved on /save and again when the session ends.

use crate::catalog::Catalog;
use crate::command::{parse_command, Command, HELP};
use crate::editor::{AddOutcome, CatalogEditor, EditSeed};
use crate::error::Result as CatalogResult;
use crate::interaction::Prompter;
use crate::product::parse_price;
use crate::storage::CatalogStore;
use anyhow::Result;
use tracing::{info, warn};

pub struct Session<S: CatalogStore, P: Prompter> {
    catalog: Catalog,
    store: S,
    prompter: P,
    sort_on_save: bool,
}

impl<S: CatalogStore, P: Prompter> Session<S, P> {
    pub fn new(catalog: Catalog, store: S, prompter: P) -> Self {
        Session {
            catalog,
            store,
            prompter,
            sort_on_save: true,
        }
    }

    /// Sort the catalog by (name, price) before each save. The store writes
    /// whatever order it is handed, so listed positions always match the file.
    pub fn with_sort_on_save(mut self, sort_on_save: bool) -> Self {
        self.sort_on_save = sort_on_save;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn into_parts(self) -> (Catalog, S, P) {
        (self.catalog, self.store, self.prompter)
    }

    /// Run until `/exit` or end of input, then save.
    pub fn run(&mut self) -> Result<()> {
        info!(
            products = self.catalog.len(),
            scorer = self.catalog.scorer_name(),
            "session started"
        );

        while let Some(line) = self.prompter.prompt(">>> ")? {
            if !self.dispatch(parse_command(&line))? {
                break;
            }
        }

        let saved = self.save();
        self.recover(saved)?;
        info!("session ended");
        Ok(())
    }

    /// Returns false when the session should stop.
    fn dispatch(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Exit => return Ok(false),
            Command::Empty => {}
            Command::ClearScreen => self.prompter.clear_screen()?,
            Command::Help => {
                for (usage, description) in HELP {
                    self.prompter.report(&format!("{}: {}", usage, description))?;
                }
            }
            Command::ShowAll => self.show(None)?,
            Command::Search(query) => {
                let indices = self.catalog.search(&query);
                if indices.is_empty() {
                    self.prompter.report("No similar products")?;
                } else {
                    self.show(Some(indices.as_slice()))?;
                }
            }
            Command::Add { name, price } => {
                let result = self.add(&name, &price);
                self.recover(result)?;
            }
            Command::Modify(index) => {
                let result = CatalogEditor::new(&mut self.catalog, &mut self.prompter)
                    .modify(index, EditSeed::default())
                    .map(|_| ());
                self.recover(result)?;
            }
            Command::Delete => {
                let result = CatalogEditor::new(&mut self.catalog, &mut self.prompter)
                    .remove_interactive();
                match result {
                    Ok(Some(removed)) => self.prompter.report(&format!("Removed: {}", removed))?,
                    Ok(None) => {}
                    Err(e) => self.recover(Err(e))?,
                }
            }
            Command::Save => {
                let saved = self.save();
                self.recover(saved)?;
            }
            Command::Invalid(line) => {
                self.prompter.report(&format!("Invalid command ({})", line))?;
            }
        }

        Ok(true)
    }

    fn add(&mut self, name: &str, price: &str) -> CatalogResult<()> {
        let price = parse_price(price)?;
        let outcome = CatalogEditor::new(&mut self.catalog, &mut self.prompter).add(name, price)?;

        if let AddOutcome::Created(id) = outcome {
            let added = self.catalog.get_by_id(id)?.to_string();
            self.prompter.report(&format!("Added: {}", added))?;
        }
        Ok(())
    }

    fn save(&mut self) -> CatalogResult<()> {
        if self.sort_on_save {
            self.catalog.sort_by_name_price();
        }
        self.store.save(self.catalog.products())?;
        self.prompter
            .report(&format!("Saved {} products", self.catalog.len()))
    }

    fn show(&mut self, indices: Option<&[usize]>) -> CatalogResult<()> {
        let lines: Vec<String> = match indices {
            Some(indices) => indices
                .iter()
                .map(|&i| self.catalog.get(i).map(|product| format!("    {}) {}", i, product)))
                .collect::<CatalogResult<_>>()?,
            None => self
                .catalog
                .iter()
                .map(|(i, product)| format!("    {}) {}", i, product))
                .collect(),
        };

        for line in lines {
            self.prompter.report(&line)?;
        }
        Ok(())
    }

    /// Report recoverable errors to the user; escalate the rest.
    fn recover(&mut self, result: CatalogResult<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_recoverable() => {
                warn!(error = %e, "operation failed");
                self.prompter.report(&e.to_string())?;
                Ok(())
            }
            Err(e) => Err(anyhow::Error::new(e).context("catalog session aborted")),
        }
    }
}

use crate::types::FileDescriptor;

/// The files currently offered to the user, with their selection flags.
///
/// Lists are replaced wholesale (a new pick or a fresh server listing),
/// never merged.
#[derive(Debug, Clone, Default)]
pub struct FileSelection {
    files: Vec<FileDescriptor>,
}

impl FileSelection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole list.
    pub fn replace(&mut self, files: Vec<FileDescriptor>) {
        self.files = files;
    }

    /// Empties the list.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Flips the selection flag of `name`. Returns the new flag, or `None`
    /// if no such file is listed.
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let file = self.files.iter_mut().find(|f| f.name == name)?;
        file.selected = !file.selected;
        Some(file.selected)
    }

    /// Sets the selection flag of every file.
    pub fn select_all(&mut self, selected: bool) {
        for file in &mut self.files {
            file.selected = selected;
        }
    }

    /// Selects exactly the named files. Returns names that were not listed.
    pub fn select_only<'a>(&mut self, names: &[&'a str]) -> Vec<&'a str> {
        for file in &mut self.files {
            file.selected = names.contains(&file.name.as_str());
        }
        names
            .iter()
            .copied()
            .filter(|n| !self.files.iter().any(|f| f.name == *n))
            .collect()
    }

    /// Selected files, in list order.
    pub fn selected(&self) -> Vec<FileDescriptor> {
        self.files.iter().filter(|f| f.selected).cloned().collect()
    }

    /// All listed files.
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Returns `true` if nothing is listed.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

//! Ordered, named sections of generated source text

/// One named block of lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: &'static str,
    lines: Vec<String>,
}

impl Section {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    pub fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Sections joined in insertion order, separated by one blank line.
/// Empty sections are dropped.
#[derive(Debug, Clone, Default)]
pub struct SourceBuilder {
    sections: Vec<Section>,
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new section and return it for filling
    pub fn section(&mut self, name: &'static str) -> &mut Section {
        self.sections.push(Section {
            name,
            lines: Vec::new(),
        });
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Names of the non-empty sections, in emission order
    pub fn names(&self) -> Vec<&'static str> {
        self.sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.name)
            .collect()
    }

    pub fn build(&self) -> String {
        let mut out = self
            .sections
            .iter()
            .filter(|s| !s.is_empty())
            .map(Section::text)
            .collect::<Vec<_>>()
            .join("\n\n");
        out.push('\n');
        out
    }
}

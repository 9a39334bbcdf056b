use crate::instrument::{category_color, Category, Host, Instrument, InstrumentPatch, NewInstrument};
use anyhow::{ensure, Result};

pub const COMMON_TAGS: [&str; 7] = [
    "GO-TO",
    "Hidden Gem",
    "Specialty",
    "Lo-Fi",
    "Experimental",
    "Cinematic",
    "Ambient",
];

/// Editable copy of the add/edit instrument dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentForm {
    pub name: String,
    pub developer: String,
    pub host: Host,
    pub category: Category,
    pub tags: Vec<String>,
    pub custom_tag: String,
    pub notes: String,
}

impl Default for InstrumentForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            developer: String::new(),
            host: Host::Other,
            category: Category::Other,
            tags: Vec::new(),
            custom_tag: String::new(),
            notes: String::new(),
        }
    }
}

impl InstrumentForm {
    pub fn from_instrument(inst: &Instrument) -> Self {
        Self {
            name: inst.name.clone(),
            developer: inst.developer.clone(),
            host: inst.host,
            category: inst.category,
            tags: inst.tags.clone(),
            custom_tag: String::new(),
            notes: inst.notes.clone(),
        }
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(index) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(index);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    /// Moves the custom tag field into the tag list.
    pub fn commit_custom_tag(&mut self) {
        let tag = self.custom_tag.trim().to_string();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self.custom_tag.clear();
    }

    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.developer.trim().is_empty()
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.name.trim().is_empty(), "Name is required");
        ensure!(!self.developer.trim().is_empty(), "Developer is required");
        Ok(())
    }

    pub fn to_new(&self) -> Result<NewInstrument> {
        self.validate()?;
        Ok(NewInstrument {
            name: self.name.trim().to_string(),
            developer: self.developer.trim().to_string(),
            host: self.host,
            category: self.category,
            tags: self.tags.clone(),
            notes: self.notes.clone(),
            color: None,
        })
    }

    /// Edits never touch the stored position or color.
    pub fn to_patch(&self) -> Result<InstrumentPatch> {
        self.validate()?;
        Ok(InstrumentPatch {
            name: Some(self.name.trim().to_string()),
            developer: Some(self.developer.trim().to_string()),
            host: Some(self.host),
            category: Some(self.category),
            tags: Some(self.tags.clone()),
            notes: Some(self.notes.clone()),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateForm {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupForm {
    pub name: String,
    pub description: String,
    pub color: String,
}

impl Default for GroupForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            color: category_color(Category::Other).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::instrument;

    #[test]
    fn blank_name_or_developer_is_rejected() {
        let mut form = InstrumentForm {
            name: "  ".to_string(),
            developer: "Spitfire".to_string(),
            ..Default::default()
        };
        assert!(form.to_new().is_err());
        assert!(!form.is_complete());

        form.name = "BBC SO".to_string();
        form.developer = String::new();
        assert!(form.to_patch().is_err());
    }

    #[test]
    fn new_instrument_is_trimmed_and_uncolored() {
        let form = InstrumentForm {
            name: " Labs ".to_string(),
            developer: " Spitfire ".to_string(),
            category: Category::Keys,
            ..Default::default()
        };
        let data = form.to_new().unwrap();
        assert_eq!(data.name, "Labs");
        assert_eq!(data.developer, "Spitfire");
        assert_eq!(data.category, Category::Keys);
        assert_eq!(data.color, None);
    }

    #[test]
    fn patch_leaves_position_and_color_alone() {
        let inst = instrument("a", "Pigments");
        let patch = InstrumentForm::from_instrument(&inst).to_patch().unwrap();
        assert_eq!(patch.name.as_deref(), Some("Pigments"));
        assert!(patch.position.is_none());
        assert!(patch.color.is_none());
    }

    #[test]
    fn tags_toggle_and_custom_tags_dedupe() {
        let mut form = InstrumentForm::default();
        form.toggle_tag("GO-TO");
        form.custom_tag = " Pads ".to_string();
        form.commit_custom_tag();
        form.custom_tag = "GO-TO".to_string();
        form.commit_custom_tag();
        assert_eq!(form.tags, vec!["GO-TO".to_string(), "Pads".to_string()]);
        assert!(form.custom_tag.is_empty());

        form.toggle_tag("GO-TO");
        assert_eq!(form.tags, vec!["Pads".to_string()]);
    }
}

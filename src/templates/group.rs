use serde::{Serialize, Serializer};

use crate::models::template::Template;

/// All language variants of one template name, in the order they were seen.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedTemplate {
    pub name: String,
    pub category: String,
    #[serde(serialize_with = "serialize_languages")]
    languages: Vec<(String, Template)>,
}

fn serialize_languages<S: Serializer>(
    languages: &[(String, Template)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(languages.iter().map(|(code, template)| (code, template)))
}

impl GroupedTemplate {
    fn new(template: &Template) -> Self {
        Self {
            name: template.name.clone(),
            category: template.category.clone(),
            languages: Vec::new(),
        }
    }

    // Last write wins; a replaced variant keeps its original position.
    fn insert(&mut self, template: Template) {
        match self
            .languages
            .iter_mut()
            .find(|(code, _)| *code == template.language)
        {
            Some((_, existing)) => *existing = template,
            None => self.languages.push((template.language.clone(), template)),
        }
    }

    pub fn language(&self, code: &str) -> Option<&Template> {
        self.languages
            .iter()
            .find(|(language, _)| language == code)
            .map(|(_, template)| template)
    }

    pub fn language_codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|(code, _)| code.as_str())
    }

    pub fn first_language(&self) -> Option<&str> {
        self.languages.first().map(|(code, _)| code.as_str())
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub template_name: String,
    pub language_code: String,
}

/// Templates indexed by name, then by language.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateCatalog {
    groups: Vec<GroupedTemplate>,
}

impl TemplateCatalog {
    pub fn from_templates<I>(templates: I) -> Self
    where
        I: IntoIterator<Item = Template>,
    {
        let mut groups: Vec<GroupedTemplate> = Vec::new();

        for template in templates {
            let index = match groups.iter().position(|g| g.name == template.name) {
                Some(index) => index,
                None => {
                    groups.push(GroupedTemplate::new(&template));
                    groups.len() - 1
                }
            };
            groups[index].insert(template);
        }

        Self { groups }
    }

    pub fn groups(&self) -> &[GroupedTemplate] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&GroupedTemplate> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn find(&self, name: &str, language: &str) -> Option<&Template> {
        self.group(name)?.language(language)
    }

    /// First group, then that group's first language.
    pub fn default_selection(&self) -> Option<Selection> {
        let group = self.groups.first()?;
        let language = group.first_language()?;

        Some(Selection {
            template_name: group.name.clone(),
            language_code: language.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

//! Output formatting utilities

use std::fmt;
use std::str::FromStr;

use kindred_core::{
    AhnentafelResult, DescendancyFamily, DescendancyNode, DescendancyResult, Family, ParentLink,
    PedigreeNode, PedigreeResult, Person, PersonSummary, RelationshipResult,
};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format '{}' (expected table or json)", other),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Serialize a result for `--format json`
pub fn format_json<T: Serialize>(data: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Print `data` as JSON, or the table rendering otherwise
pub fn emit<T: Serialize>(
    data: &T,
    format: OutputFormat,
    table: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", format_json(data)?),
        OutputFormat::Table => println!("{}", table(data)),
    }
    Ok(())
}

fn tagged(person: &PersonSummary) -> String {
    format!("{} [{}]", person.label(), person.id)
}

pub fn render_person(person: &Person) -> String {
    let mut lines = vec![
        format!("ID:      {}", person.id),
        format!("Name:    {}", person.display_name()),
        format!("Gender:  {}", person.gender),
    ];
    if person.birth_date.is_some() || person.birth_place.is_some() {
        lines.push(format!("Born:    {}", event(&person.birth_date, &person.birth_place)));
    }
    if person.death_date.is_some() || person.death_place.is_some() {
        lines.push(format!("Died:    {}", event(&person.death_date, &person.death_place)));
    }
    lines.join("\n")
}

fn event<D: fmt::Display>(date: &Option<D>, place: &Option<String>) -> String {
    match (date, place) {
        (Some(d), Some(p)) => format!("{}, {}", d, p),
        (Some(d), None) => d.to_string(),
        (None, Some(p)) => p.clone(),
        (None, None) => String::new(),
    }
}

pub fn render_person_list(persons: &[Person]) -> String {
    if persons.is_empty() {
        return "No persons found".to_string();
    }
    let width = persons.iter().map(|p| p.id.as_str().len()).max().unwrap_or(2).max(2);
    let mut lines = vec![format!("{:<width$}  {:<8} NAME", "ID", "GENDER")];
    for person in persons {
        lines.push(format!(
            "{:<width$}  {:<8} {}",
            person.id.as_str(),
            person.gender.to_string(),
            PersonSummary::from(person).label()
        ));
    }
    lines.join("\n")
}

pub fn render_family(family: &Family) -> String {
    let partner = |p: &Option<kindred_core::FamilyPartner>| match p {
        Some(p) => format!("{} [{}]", p.name, p.id),
        None => "(unknown)".to_string(),
    };
    let mut lines = vec![
        format!("ID:        {}", family.id),
        format!("Partner 1: {}", partner(&family.partner1)),
        format!("Partner 2: {}", partner(&family.partner2)),
    ];
    if family.marriage_date.is_some() || family.marriage_place.is_some() {
        lines.push(format!(
            "Married:   {}",
            event(&family.marriage_date, &family.marriage_place)
        ));
    }
    if family.children.is_empty() {
        lines.push("Children:  none".to_string());
    } else {
        lines.push("Children:".to_string());
        for child in &family.children {
            lines.push(format!("  {} ({})", child.person_id, child.relation));
        }
    }
    lines.join("\n")
}

pub fn render_family_list(families: &[Family]) -> String {
    if families.is_empty() {
        return "No families found".to_string();
    }
    families
        .iter()
        .map(|f| {
            let partners: Vec<&str> = f.partners().map(|p| p.name.as_str()).collect();
            format!(
                "{}  {}  ({} children)",
                f.id,
                if partners.is_empty() {
                    "(no partners)".to_string()
                } else {
                    partners.join(" & ")
                },
                f.children.len()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_parent_link(link: &ParentLink) -> String {
    let parent = |id: &Option<kindred_core::PersonId>, name: &Option<String>| match (id, name) {
        (Some(id), Some(name)) => format!("{} [{}]", name, id),
        (Some(id), None) => id.to_string(),
        _ => "(unknown)".to_string(),
    };
    format!(
        "Person:  {}\nFather:  {}\nMother:  {}",
        link.person_id,
        parent(&link.father_id, &link.father_name),
        parent(&link.mother_id, &link.mother_name)
    )
}

/// Indented ancestor tree, father's line first
pub fn render_pedigree(result: &PedigreeResult) -> String {
    let mut lines = Vec::new();
    let mut stack: Vec<(&PedigreeNode, Option<&str>)> = vec![(&result.root, None)];

    while let Some((node, role)) = stack.pop() {
        let indent = "  ".repeat(node.generation as usize);
        match role {
            Some(role) => lines.push(format!("{}{}: {}", indent, role, tagged(&node.person))),
            None => lines.push(tagged(&node.person)),
        }
        if let Some(mother) = &node.mother {
            stack.push((mother, Some("mother")));
        }
        if let Some(father) = &node.father {
            stack.push((father, Some("father")));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} ancestors over {} of {} generations",
        result.total_ancestors, result.max_generation_reached, result.generations_requested
    ));
    lines.join("\n")
}

enum DescendancyLine<'a> {
    Person(&'a DescendancyNode, usize),
    Family(&'a DescendancyFamily, usize),
}

/// Indented descendant tree: each family's spouse line precedes its children
pub fn render_descendancy(result: &DescendancyResult) -> String {
    let mut lines = Vec::new();
    let mut stack = vec![DescendancyLine::Person(&result.root, 0)];

    while let Some(line) = stack.pop() {
        match line {
            DescendancyLine::Person(node, depth) => {
                lines.push(format!("{}{}", "    ".repeat(depth), tagged(&node.person)));
                for family in node.families.iter().rev() {
                    stack.push(DescendancyLine::Family(family, depth));
                }
            }
            DescendancyLine::Family(family, depth) => {
                let spouse = match &family.spouse {
                    Some(s) => format!("{} [{}]", s.name, s.id),
                    None => "(unknown spouse)".to_string(),
                };
                let married = match &family.marriage_date {
                    Some(date) => format!(", m. {}", date),
                    None => String::new(),
                };
                lines.push(format!("{}  + {}{}", "    ".repeat(depth), spouse, married));
                for child in family.children.iter().rev() {
                    stack.push(DescendancyLine::Person(child, depth + 1));
                }
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} descendants over {} of {} generations",
        result.total_descendants, result.max_generation_reached, result.generations_requested
    ));
    lines.join("\n")
}

pub fn render_ahnentafel(result: &AhnentafelResult) -> String {
    let width = result
        .entries
        .last()
        .map(|e| e.number.to_string().len())
        .unwrap_or(1);
    let mut lines: Vec<String> = result
        .entries
        .iter()
        .map(|e| format!("{:>width$}  gen {}  {}", e.number, e.generation, tagged(&e.person)))
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "{} entries over {} generations",
        result.total_entries, result.max_generation
    ));
    lines.join("\n")
}

pub fn render_relationship(result: &RelationshipResult) -> String {
    let a = &result.person_a;
    let b = &result.person_b;
    if !result.is_related {
        return format!(
            "{} [{}] and {} [{}] are not related",
            a.name, a.id, b.name, b.id
        );
    }

    let mut lines = vec![format!(
        "{} [{}] to {} [{}]: {}",
        b.name, b.id, a.name, a.id, result.summary
    )];
    for path in &result.paths {
        lines.push(format!(
            "  {} through {} ({} up from {}, {} up from {})",
            path.name,
            tagged(&path.common_ancestor),
            path.generations_a,
            a.id,
            path.generations_b,
            b.id
        ));
        let up: Vec<&str> = path.path_from_a.iter().map(|id| id.as_str()).collect();
        let down: Vec<&str> = path
            .path_from_b
            .iter()
            .rev()
            .skip(1)
            .map(|id| id.as_str())
            .collect();
        let mut chain = up.join(" -> ");
        if !down.is_empty() {
            chain.push_str(" <- ");
            chain.push_str(&down.join(" <- "));
        }
        lines.push(format!("    {}", chain));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_core::Gender;

    fn summary(id: &str, name: &str) -> PersonSummary {
        PersonSummary::from(Person::with_id(id, name, "", Gender::Unknown))
    }

    fn node(id: &str, generation: u32) -> PedigreeNode {
        PedigreeNode {
            person: summary(id, id),
            generation,
            father: None,
            mother: None,
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_pedigree_lists_father_first() {
        let mut root = node("me", 0);
        let mut father = node("dad", 1);
        father.mother = Some(Box::new(node("gran", 2)));
        root.father = Some(Box::new(father));
        root.mother = Some(Box::new(node("mum", 1)));
        let result = PedigreeResult {
            root,
            total_ancestors: 3,
            max_generation_reached: 2,
            generations_requested: 5,
        };

        let text = render_pedigree(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "me [me]");
        assert_eq!(lines[1], "  father: dad [dad]");
        assert_eq!(lines[2], "    mother: gran [gran]");
        assert_eq!(lines[3], "  mother: mum [mum]");
        assert!(text.ends_with("3 ancestors over 2 of 5 generations"));
    }

    #[test]
    fn test_unrelated_message() {
        let result = RelationshipResult {
            person_a: summary("I1", "Ann"),
            person_b: summary("I2", "Bob"),
            paths: Vec::new(),
            is_related: false,
            summary: "not related".to_string(),
        };
        assert_eq!(
            render_relationship(&result),
            "Ann [I1] and Bob [I2] are not related"
        );
    }
}

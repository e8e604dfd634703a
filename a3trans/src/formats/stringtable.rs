//! Support for the game's `stringtable.xml` catalog format.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <Project name="My Mission">
//!     <Package name="Main">
//!         <Container name="intro">
//!             <Key ID="str_intro_title">
//!                 <Original>Welcome</Original>
//!                 <German>Willkommen</German>
//!             </Key>
//!         </Container>
//!     </Package>
//! </Project>
//! ```
//!
//! Every child element of a `Key` is a translation whose tag is the language.

use std::io::{BufRead, Write};

use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    formats::dom::{Element, parse_document},
    traits::Parser,
    types::{Container, DEFAULT_PROJECT_NAME, Key, Package, Project},
};

const INDENT: usize = 4;

/// A stringtable document; a thin wrapper over the catalog it describes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    pub project: Project,
}

impl From<Project> for Format {
    fn from(project: Project) -> Self {
        Format { project }
    }
}

impl From<Format> for Project {
    fn from(value: Format) -> Self {
        value.project
    }
}

impl Parser for Format {
    /// Parses a stringtable. Fails when the root is not `<Project>` or when
    /// no package with content is found.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let root = parse_document(reader)?;
        if root.name != "Project" {
            return Err(Error::malformed(format!(
                "expected root element <Project>, found <{}>",
                root.name
            )));
        }

        let name = root.attribute("name").unwrap_or(DEFAULT_PROJECT_NAME);
        let mut project = Project::new(name);

        for package in root.children_named("Package") {
            read_package(&mut project, package);
        }

        if project.is_empty() {
            return Err(Error::EmptyProject(format!(
                "stringtable of project '{}' has no packages with content",
                project.name()
            )));
        }

        Ok(Format { project })
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', INDENT);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut root = BytesStart::new("Project");
        root.push_attribute(("name", self.project.name()));
        xml_writer.write_event(Event::Start(root))?;

        for package in self.project.packages().filter(|p| !p.is_empty()) {
            write_package(&mut xml_writer, package)?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("Project")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn read_package(project: &mut Project, package: &Element) {
    let package_name = package.attribute("name").unwrap_or_default();
    for container in package.descendants_named("Container") {
        let container_name = container.attribute("name").unwrap_or_default();
        for key in container.descendants_named("Key") {
            let Some(id) = key.attribute("ID").filter(|id| !id.is_empty()) else {
                tracing::debug!(container = container_name, "skipping key without ID");
                continue;
            };
            for translation in key.child_elements() {
                project.set_translation(
                    package_name,
                    container_name,
                    id,
                    &translation.name,
                    &translation.text(),
                );
            }
        }
    }
}

fn write_package<W: Write>(xml_writer: &mut Writer<W>, package: &Package) -> Result<(), Error> {
    let mut elem = BytesStart::new("Package");
    elem.push_attribute(("name", package.name()));
    xml_writer.write_event(Event::Start(elem))?;
    for container in package.containers().filter(|c| !c.is_empty()) {
        write_container(xml_writer, container)?;
    }
    xml_writer.write_event(Event::End(BytesEnd::new("Package")))?;
    Ok(())
}

fn write_container<W: Write>(
    xml_writer: &mut Writer<W>,
    container: &Container,
) -> Result<(), Error> {
    let mut elem = BytesStart::new("Container");
    elem.push_attribute(("name", container.name()));
    xml_writer.write_event(Event::Start(elem))?;
    for key in container.keys().filter(|k| !k.is_empty()) {
        write_key(xml_writer, key)?;
    }
    xml_writer.write_event(Event::End(BytesEnd::new("Container")))?;
    Ok(())
}

fn write_key<W: Write>(xml_writer: &mut Writer<W>, key: &Key) -> Result<(), Error> {
    let mut elem = BytesStart::new("Key");
    elem.push_attribute(("ID", key.id()));
    xml_writer.write_event(Event::Start(elem))?;
    for translation in key.translations() {
        let tag = translation.language();
        xml_writer.write_event(Event::Start(BytesStart::new(tag)))?;
        xml_writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
            translation.text(),
        ))))?;
        xml_writer.write_event(Event::End(BytesEnd::new(tag)))?;
    }
    xml_writer.write_event(Event::End(BytesEnd::new("Key")))?;
    Ok(())
}

//! Support for XLIFF 1.2 and 2.0 interchange files.
//!
//! Both versions describe the same three levels, with different vocabulary:
//!
//! | catalog   | XLIFF 1.2      | XLIFF 2.0   |
//! |-----------|----------------|-------------|
//! | Package   | `group`        | `group`     |
//! | Container | nested `group` | `unit`      |
//! | Key       | `trans-unit`   | `segment`   |
//!
//! The source text always comes from the `Original` translation, the target
//! text from the translation tagged with the target language's display name.
//! One file holds at most one target language.

use std::{
    fmt::{Display, Formatter},
    io::{BufRead, Write},
    str::FromStr,
};

use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    formats::{
        dom::{Element, parse_document},
        xml_id,
    },
    language::LanguageCode,
    traits::Parser,
    types::{DEFAULT_PROJECT_NAME, ORIGINAL, Project},
};

pub const XMLNS_1_2: &str = "urn:oasis:names:tc:xliff:document:1.2";
pub const XMLNS_2_0: &str = "urn:oasis:names:tc:xliff:document:2.0";

const DEFAULT_SOURCE_LANGUAGE: &str = "en";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XliffVersion {
    #[default]
    V1_2,
    V2_0,
}

impl XliffVersion {
    pub fn namespace(self) -> &'static str {
        match self {
            XliffVersion::V1_2 => XMLNS_1_2,
            XliffVersion::V2_0 => XMLNS_2_0,
        }
    }

    /// Maps a document's `version` attribute to a supported major version.
    pub fn from_document_version(version: &str) -> Result<Self, Error> {
        match version.trim().chars().next() {
            Some('1') => Ok(XliffVersion::V1_2),
            Some('2') => Ok(XliffVersion::V2_0),
            _ => Err(Error::UnsupportedVersion(version.to_string())),
        }
    }
}

impl Display for XliffVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            XliffVersion::V1_2 => write!(f, "1.2"),
            XliffVersion::V2_0 => write!(f, "2.0"),
        }
    }
}

/// Accepts `1`, `1.2`, `2` and `2.0`.
impl FromStr for XliffVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "1.2" => Ok(XliffVersion::V1_2),
            "2" | "2.0" => Ok(XliffVersion::V2_0),
            other => Err(Error::UnsupportedVersion(other.to_string())),
        }
    }
}

/// One XLIFF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub version: XliffVersion,
    /// XML id of the project (`file/@original` in 1.2, `file/@id` in 2.0).
    pub project_id: String,
    /// Source language code, kept verbatim.
    pub source_language: String,
    /// Absent for the language independent `strings.xlf`.
    pub target_language: Option<LanguageCode>,
    pub groups: Vec<Group>,
}

/// A package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub units: Vec<Unit>,
}

/// A container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: String,
    pub segments: Vec<Segment>,
}

/// A key with its source and optional target text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: String,
    pub source: String,
    pub target: Option<String>,
}

impl Format {
    /// Builds the document for one target language (or none) from a catalog.
    ///
    /// Only keys with an `Original` translation are exported; groups and
    /// units left without segments are dropped.
    pub fn from_project(
        project: &Project,
        source_language: LanguageCode,
        target_language: Option<LanguageCode>,
        version: XliffVersion,
    ) -> Self {
        let target_tag = target_language.map(LanguageCode::display_name);

        let groups = project
            .packages()
            .filter_map(|package| {
                let units: Vec<Unit> = package
                    .containers()
                    .filter_map(|container| {
                        let segments: Vec<Segment> = container
                            .keys()
                            .filter_map(|key| {
                                let source = key.original()?;
                                Some(Segment {
                                    id: xml_id(key.id()),
                                    source: source.text().to_string(),
                                    target: target_tag
                                        .and_then(|tag| key.translation(tag))
                                        .map(|t| t.text().to_string()),
                                })
                            })
                            .collect();
                        (!segments.is_empty()).then(|| Unit {
                            id: xml_id(container.name()),
                            segments,
                        })
                    })
                    .collect();
                (!units.is_empty()).then(|| Group {
                    id: xml_id(package.name()),
                    units,
                })
            })
            .collect();

        Format {
            version,
            project_id: xml_id(project.name()),
            source_language: source_language.code().to_string(),
            target_language,
            groups,
        }
    }

    /// Project name recovered from the document's project id.
    pub fn project_name(&self) -> String {
        if self.project_id.trim().is_empty() {
            DEFAULT_PROJECT_NAME.to_string()
        } else {
            self.project_id.replace('_', " ")
        }
    }

    /// Merges every segment into `project`: the source becomes `Original`,
    /// the target is stored under the target language's display name.
    ///
    /// Group and unit ids are used verbatim as package and container names;
    /// the `_` written for spaces on export is not reverted here.
    pub fn merge_into(&self, project: &mut Project) {
        project.set_name(self.project_name());
        let target_tag = self.target_language.map(LanguageCode::display_name);

        for group in &self.groups {
            for unit in &group.units {
                for segment in &unit.segments {
                    project.set_translation(&group.id, &unit.id, &segment.id, ORIGINAL, &segment.source);
                    if let Some(tag) = target_tag {
                        project.set_translation(
                            &group.id,
                            &unit.id,
                            &segment.id,
                            tag,
                            segment.target.as_deref().unwrap_or_default(),
                        );
                    }
                }
            }
        }
    }

    pub fn segment_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.units)
            .map(|u| u.segments.len())
            .sum()
    }
}

impl From<Format> for Project {
    fn from(value: Format) -> Self {
        let mut project = Project::default();
        value.merge_into(&mut project);
        project
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let root = parse_document(reader)?;
        if root.name != "xliff" {
            return Err(Error::malformed(format!(
                "expected root element <xliff>, found <{}>",
                root.name
            )));
        }

        let version = root
            .non_empty_attribute("version")
            .ok_or_else(|| Error::MissingField("xliff/@version".to_string()))?;
        let version = XliffVersion::from_document_version(version)?;

        match version {
            XliffVersion::V1_2 => parse_v1(&root),
            XliffVersion::V2_0 => parse_v2(&root),
        }
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);
        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;

        match self.version {
            XliffVersion::V1_2 => self.write_v1(&mut xml_writer)?,
            XliffVersion::V2_0 => self.write_v2(&mut xml_writer)?,
        }

        xml_writer.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

impl Format {
    fn write_v1<W: Write>(&self, xml_writer: &mut Writer<W>) -> Result<(), Error> {
        let mut root = BytesStart::new("xliff");
        root.push_attribute(("xmlns", XMLNS_1_2));
        root.push_attribute(("version", "1.2"));
        xml_writer.write_event(Event::Start(root))?;

        let mut file = BytesStart::new("file");
        file.push_attribute(("original", self.project_id.as_str()));
        file.push_attribute(("source-language", self.source_language.as_str()));
        if let Some(target) = self.target_language {
            file.push_attribute(("target-language", target.code()));
        }
        file.push_attribute(("datatype", "plaintext"));
        xml_writer.write_event(Event::Start(file))?;
        xml_writer.write_event(Event::Start(BytesStart::new("body")))?;

        for group in &self.groups {
            start_with_id(xml_writer, "group", &group.id)?;
            for unit in &group.units {
                start_with_id(xml_writer, "group", &unit.id)?;
                for segment in &unit.segments {
                    write_segment(xml_writer, "trans-unit", segment)?;
                }
                xml_writer.write_event(Event::End(BytesEnd::new("group")))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("group")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("body")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("file")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        Ok(())
    }

    fn write_v2<W: Write>(&self, xml_writer: &mut Writer<W>) -> Result<(), Error> {
        let mut root = BytesStart::new("xliff");
        root.push_attribute(("xmlns", XMLNS_2_0));
        root.push_attribute(("version", "2.0"));
        root.push_attribute(("srcLang", self.source_language.as_str()));
        root.push_attribute((
            "trgLang",
            self.target_language.map(LanguageCode::code).unwrap_or_default(),
        ));
        xml_writer.write_event(Event::Start(root))?;

        start_with_id(xml_writer, "file", &self.project_id)?;
        for group in &self.groups {
            start_with_id(xml_writer, "group", &group.id)?;
            for unit in &group.units {
                start_with_id(xml_writer, "unit", &unit.id)?;
                for segment in &unit.segments {
                    write_segment(xml_writer, "segment", segment)?;
                }
                xml_writer.write_event(Event::End(BytesEnd::new("unit")))?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("group")))?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("file")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        Ok(())
    }
}

fn start_with_id<W: Write>(xml_writer: &mut Writer<W>, tag: &str, id: &str) -> Result<(), Error> {
    let mut elem = BytesStart::new(tag);
    elem.push_attribute(("id", id));
    xml_writer.write_event(Event::Start(elem))?;
    Ok(())
}

fn write_segment<W: Write>(
    xml_writer: &mut Writer<W>,
    tag: &str,
    segment: &Segment,
) -> Result<(), Error> {
    start_with_id(xml_writer, tag, &segment.id)?;
    write_text_element(xml_writer, "source", &segment.source)?;
    if let Some(target) = &segment.target {
        write_text_element(xml_writer, "target", target)?;
    }
    xml_writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    tag: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(tag)))?;
    xml_writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    xml_writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn parse_target_language(code: Option<&str>) -> Result<LanguageCode, Error> {
    let code = code.ok_or_else(|| Error::MissingField("target language".to_string()))?;
    code.parse::<LanguageCode>()
}

fn source_language_or_default(code: Option<&str>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => {
            tracing::warn!(
                "no source language set, using default: {}",
                DEFAULT_SOURCE_LANGUAGE
            );
            DEFAULT_SOURCE_LANGUAGE.to_string()
        }
    }
}

fn project_id_or_default(id: Option<&str>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => {
            tracing::warn!(
                "no project name set, using default: {}",
                DEFAULT_PROJECT_NAME
            );
            xml_id(DEFAULT_PROJECT_NAME)
        }
    }
}

fn read_segment(element: &Element) -> Segment {
    Segment {
        id: element.attribute("id").unwrap_or_default().to_string(),
        source: element
            .first_child("source")
            .map(Element::text)
            .unwrap_or_default(),
        target: element.first_child("target").map(Element::text),
    }
}

fn parse_v1(root: &Element) -> Result<Format, Error> {
    let file = root
        .first_child("file")
        .ok_or_else(|| Error::malformed("missing <file> element"))?;

    let target_language = parse_target_language(file.non_empty_attribute("target-language"))?;
    let project_id = project_id_or_default(file.non_empty_attribute("original"));
    let source_language = source_language_or_default(file.non_empty_attribute("source-language"));

    let body = file
        .first_child("body")
        .ok_or_else(|| Error::malformed("missing <body> element"))?;

    let groups: Vec<Group> = body
        .children_named("group")
        .map(|package| Group {
            id: package.attribute("id").unwrap_or_default().to_string(),
            units: package
                .children_named("group")
                .map(|container| Unit {
                    id: container.attribute("id").unwrap_or_default().to_string(),
                    segments: container.children_named("trans-unit").map(read_segment).collect(),
                })
                .collect(),
        })
        .collect();

    if groups.is_empty() {
        return Err(Error::malformed("no package <group> elements found"));
    }

    Ok(Format {
        version: XliffVersion::V1_2,
        project_id,
        source_language,
        target_language: Some(target_language),
        groups,
    })
}

fn parse_v2(root: &Element) -> Result<Format, Error> {
    let target_language = parse_target_language(root.non_empty_attribute("trgLang"))?;
    let source_language = source_language_or_default(root.non_empty_attribute("srcLang"));

    let file = root
        .first_child("file")
        .ok_or_else(|| Error::malformed("missing <file> element"))?;
    let project_id = project_id_or_default(file.non_empty_attribute("id"));

    let groups: Vec<Group> = file
        .children_named("group")
        .map(|package| Group {
            id: package.attribute("id").unwrap_or_default().to_string(),
            units: package
                .children_named("unit")
                .map(|container| Unit {
                    id: container.attribute("id").unwrap_or_default().to_string(),
                    segments: container.children_named("segment").map(read_segment).collect(),
                })
                .collect(),
        })
        .collect();

    if groups.is_empty() {
        return Err(Error::malformed("no package <group> elements found"));
    }

    Ok(Format {
        version: XliffVersion::V2_0,
        project_id,
        source_language,
        target_language: Some(target_language),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let mut project = Project::new("My Mission");
        project.set_translation("Main", "mission 1", "k1", ORIGINAL, "Hi");
        project.set_translation("Main", "mission 1", "k1", "German", "Hallo");
        project.set_translation("Main", "mission 1", "k2", ORIGINAL, "Bye");
        project.set_translation("Main", "no source", "k3", "German", "Nur Deutsch");
        project
    }

    #[test]
    fn test_write_v1_nesting() {
        let format = Format::from_project(
            &sample_project(),
            LanguageCode::English,
            Some(LanguageCode::German),
            XliffVersion::V1_2,
        );
        let out = format.to_xml_string().unwrap();
        assert!(out.contains(r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">"#));
        assert!(out.contains(
            r#"<file original="My_Mission" source-language="en" target-language="de" datatype="plaintext">"#
        ));
        assert!(out.contains(
            r#"<group id="Main"><group id="mission_1"><trans-unit id="k1"><source>Hi</source><target>Hallo</target></trans-unit>"#
        ));
        assert!(out.contains(r#"<trans-unit id="k2"><source>Bye</source></trans-unit>"#));
        assert!(!out.contains("no_source"));
        assert!(!out.contains("Nur Deutsch"));
    }

    #[test]
    fn test_write_v1_source_only() {
        let format = Format::from_project(
            &sample_project(),
            LanguageCode::English,
            None,
            XliffVersion::V1_2,
        );
        let out = format.to_xml_string().unwrap();
        assert!(!out.contains("target-language"));
        assert!(!out.contains("<target>"));
    }

    #[test]
    fn test_write_v2_nesting() {
        let format = Format::from_project(
            &sample_project(),
            LanguageCode::English,
            Some(LanguageCode::German),
            XliffVersion::V2_0,
        );
        let out = format.to_xml_string().unwrap();
        assert!(out.contains(
            r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en" trgLang="de">"#
        ));
        assert!(out.contains(
            r#"<file id="My_Mission"><group id="Main"><unit id="mission_1"><segment id="k1"><source>Hi</source><target>Hallo</target></segment>"#
        ));
    }

    #[test]
    fn test_empty_project_writes_no_groups() {
        let format = Format::from_project(
            &Project::new("Nothing"),
            LanguageCode::English,
            Some(LanguageCode::French),
            XliffVersion::V1_2,
        );
        assert!(format.groups.is_empty());
        let out = format.to_xml_string().unwrap();
        assert!(out.contains("<body></body>"));
    }

    #[test]
    fn test_parse_v1() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:1.2" version="1.2">
  <file original="My_Mission" source-language="en" target-language="fr" datatype="plaintext">
    <body>
      <group id="Main">
        <group id="mission_1">
          <trans-unit id="k1"><source>Hi</source><target>Salut</target></trans-unit>
          <trans-unit id="k2"><source>Bye</source></trans-unit>
        </group>
      </group>
    </body>
  </file>
</xliff>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.version, XliffVersion::V1_2);
        assert_eq!(format.target_language, Some(LanguageCode::French));
        assert_eq!(format.segment_count(), 2);

        let project = Project::from(format);
        assert_eq!(project.name(), "My Mission");
        // ids are kept as written
        assert!(project.package("Main").unwrap().container("mission_1").is_some());
        assert!(project.package("Main").unwrap().container("mission 1").is_none());
        assert_eq!(
            project.get_translation("Main", "mission_1", "k1", "French").unwrap().text(),
            "Salut"
        );
        assert_eq!(project.get_all_translations("Main", "mission_1", "k2").len(), 1);
    }

    #[test]
    fn test_parse_v2() {
        let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" trgLang="ja">
  <file id="Demo">
    <group id="Main"><unit id="intro"><segment id="str_a"><source>Hello</source><target>こんにちは</target></segment></unit></group>
  </file>
</xliff>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.version, XliffVersion::V2_0);
        assert_eq!(format.source_language, "en");
        let project = Project::from(format);
        assert_eq!(
            project.get_translation("Main", "intro", "str_a", "Japanese").unwrap().text(),
            "こんにちは"
        );
    }

    #[test]
    fn test_unsupported_target_language() {
        let xml = r#"<xliff version="2.0" srcLang="en" trgLang="xx"><file id="p"><group id="g"><unit id="u"><segment id="s"><source>a</source><target>b</target></segment></unit></group></file></xliff>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(code) if code == "xx"));
    }

    #[test]
    fn test_missing_target_language() {
        let xml = r#"<xliff version="1.2"><file original="p" source-language="en"><body><group id="g"/></body></file></xliff>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn test_unsupported_version() {
        let xml = r#"<xliff version="3.0" trgLang="de"><file id="p"/></xliff>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(v) if v == "3.0"));
        let err = Format::from_str(r#"<xliff><file/></xliff>"#).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn test_older_1x_versions_are_read() {
        let xml = r#"<xliff version="1.1"><file original="p" target-language="DE"><body><group id="g"><group id="c"><trans-unit id="k"><source>a</source><target>b</target></trans-unit></group></group></body></file></xliff>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.target_language, Some(LanguageCode::German));
    }

    #[test]
    fn test_wrong_root() {
        let err = Format::from_str(r#"<Project name="x"/>"#).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!("2".parse::<XliffVersion>().unwrap(), XliffVersion::V2_0);
        assert_eq!("1.2".parse::<XliffVersion>().unwrap(), XliffVersion::V1_2);
        assert!("3".parse::<XliffVersion>().is_err());
    }
}

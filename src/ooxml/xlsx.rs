//! Spreadsheet package text extraction (.xlsx, .xlsm, .xlsb, .xltx,
//! .xltm).
//!
//! Builds the shared-string table from `xl/sharedStrings.xml`, resolves
//! sheet display names by cross-referencing `xl/workbook.xml` against the
//! workbook relationships, then walks each worksheet's rows and cells.
//! Cell value resolution dispatches on the cell type attribute: `s` is a
//! shared-string index, `inlineStr` an inline run, `str` a formula
//! result, and anything else the raw value.
//!
//! The shared-string and sheet-name tables live for one extraction call
//! and are discarded with it; there is no cross-file cache.

use crate::common::xml;
use pulp_zip::ZipReader;
use std::collections::HashMap;

/// Extract all text from a spreadsheet package.
///
/// Each worksheet emits tab-separated rows under a `Sheet: <name>`
/// header; worksheets are ordered by natural part-name order.
pub fn extract(archive: &ZipReader) -> String {
    let shared = shared_strings(archive);
    let display_names = sheet_names(archive);

    let mut parts: Vec<String> = archive
        .names()
        .filter(|name| {
            name.starts_with("xl/worksheets/")
                && name.ends_with(".xml")
                && !name.contains("_rels")
        })
        .map(str::to_string)
        .collect();
    parts.sort_by(|a, b| xml::natural_cmp(a, b));

    let mut blocks = Vec::new();
    for part_name in parts {
        let Some(part) = archive.get_str(&part_name) else {
            continue;
        };
        let display = display_names
            .get(part_name.as_str())
            .cloned()
            .unwrap_or_else(|| fallback_name(&part_name));
        let mut lines = vec![format!("Sheet: {display}")];
        for row in xml::elements(&part, "row") {
            let cells: Vec<String> = xml::elements(row.inner, "c")
                .iter()
                .map(|cell| cell_value(cell.attrs, cell.inner, &shared))
                .collect();
            let line = cells.join("\t");
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        blocks.push(lines.join("\n"));
    }
    blocks.join("\n\n")
}

/// Parse the shared-string table; rich-text entries concatenate their runs.
fn shared_strings(archive: &ZipReader) -> Vec<String> {
    let Some(part) = archive.get_str("xl/sharedStrings.xml") else {
        return Vec::new();
    };
    xml::elements(&part, "si")
        .iter()
        .map(|si| {
            xml::elements(si.inner, "t")
                .iter()
                .map(|t| xml::decode_entities(t.inner))
                .collect::<String>()
        })
        .collect()
}

/// Map worksheet part paths to their display names.
///
/// `xl/workbook.xml` gives `name` + relationship id per sheet; the
/// workbook rels file maps relationship ids to part targets.
fn sheet_names(archive: &ZipReader) -> HashMap<String, String> {
    let mut names = HashMap::new();
    let (Some(workbook), Some(rels)) = (
        archive.get_str("xl/workbook.xml"),
        archive.get_str("xl/_rels/workbook.xml.rels"),
    ) else {
        return names;
    };

    let mut targets: HashMap<String, String> = HashMap::new();
    for rel in xml::elements(&rels, "Relationship") {
        if let (Some(id), Some(target)) = (
            xml::attr_value(rel.attrs, "Id"),
            xml::attr_value(rel.attrs, "Target"),
        ) {
            targets.insert(id.to_string(), normalize_target(target));
        }
    }

    for sheet in xml::elements(&workbook, "sheet") {
        let Some(display) = xml::attr_value(sheet.attrs, "name") else {
            continue;
        };
        if let Some(part) = xml::attr_value(sheet.attrs, "r:id")
            .and_then(|id| targets.get(id))
        {
            names.insert(part.clone(), xml::decode_entities(display));
        }
    }
    names
}

/// Relationship targets are relative to `xl/` unless rooted.
fn normalize_target(target: &str) -> String {
    if let Some(rooted) = target.strip_prefix('/') {
        rooted.to_string()
    } else {
        format!("xl/{target}")
    }
}

/// Display-name fallback when relationships are missing: the part stem.
fn fallback_name(part_name: &str) -> String {
    part_name
        .rsplit('/')
        .next()
        .and_then(|file| file.strip_suffix(".xml"))
        .unwrap_or(part_name)
        .to_string()
}

/// Resolve one cell to display text based on its type attribute.
fn cell_value(attrs: &str, inner: &str, shared: &[String]) -> String {
    match xml::attr_value(attrs, "t") {
        Some("s") => xml::first_element(inner, "v")
            .and_then(|v| v.inner.trim().parse::<usize>().ok())
            .and_then(|idx| shared.get(idx).cloned())
            .unwrap_or_default(),
        Some("inlineStr") => xml::first_element(inner, "is")
            .map(|is| {
                xml::elements(is.inner, "t")
                    .iter()
                    .map(|t| xml::decode_entities(t.inner))
                    .collect::<String>()
            })
            .unwrap_or_default(),
        // `str` formula results and plain numeric cells both carry <v>.
        _ => xml::first_element(inner, "v")
            .map(|v| xml::decode_entities(v.inner.trim()))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulp_zip::ZipWriter;

    fn package(parts: &[(&str, &str)]) -> ZipReader {
        let mut writer = ZipWriter::new();
        for (name, body) in parts {
            writer.add(name, body.as_bytes()).unwrap();
        }
        ZipReader::parse(&writer.finish()).unwrap()
    }

    const SHARED: &str = "<sst><si><t>Name</t></si>\
        <si><r><t>Ri</t></r><r><t>ch</t></r></si></sst>";
    const WORKBOOK: &str = "<workbook><sheets>\
        <sheet name=\"Summary\" sheetId=\"1\" r:id=\"rId1\"/>\
        </sheets></workbook>";
    const RELS: &str = "<Relationships>\
        <Relationship Id=\"rId1\" Type=\"ws\" Target=\"worksheets/sheet1.xml\"/>\
        </Relationships>";

    #[test]
    fn cells_dispatch_on_type_attribute() {
        let sheet = "<worksheet><sheetData>\
            <row r=\"1\">\
            <c r=\"A1\" t=\"s\"><v>0</v></c>\
            <c r=\"B1\" t=\"s\"><v>1</v></c>\
            <c r=\"C1\"><v>42.5</v></c>\
            <c r=\"D1\" t=\"inlineStr\"><is><t>inline</t></is></c>\
            <c r=\"E1\" t=\"str\"><f>A1&amp;B1</f><v>NameRich</v></c>\
            </row>\
            </sheetData></worksheet>";
        let archive = package(&[
            ("xl/workbook.xml", WORKBOOK),
            ("xl/_rels/workbook.xml.rels", RELS),
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet1.xml", sheet),
        ]);
        assert_eq!(
            extract(&archive),
            "Sheet: Summary\nName\tRich\t42.5\tinline\tNameRich"
        );
    }

    #[test]
    fn sheets_sort_naturally_and_fall_back_to_part_stem() {
        let sheet = |v: &str| format!("<worksheet><row><c><v>{v}</v></c></row></worksheet>");
        let archive = package(&[
            ("xl/worksheets/sheet10.xml", &sheet("ten")),
            ("xl/worksheets/sheet2.xml", &sheet("two")),
        ]);
        assert_eq!(
            extract(&archive),
            "Sheet: sheet2\ntwo\n\nSheet: sheet10\nten"
        );
    }

    #[test]
    fn missing_shared_string_index_renders_empty() {
        let sheet = "<worksheet><row>\
            <c t=\"s\"><v>99</v></c><c><v>7</v></c>\
            </row></worksheet>";
        let archive = package(&[("xl/worksheets/sheet1.xml", sheet)]);
        assert_eq!(extract(&archive), "Sheet: sheet1\n\t7");
    }

    #[test]
    fn empty_package_yields_empty_text() {
        let archive = package(&[("xl/styles.xml", "<styleSheet/>")]);
        assert_eq!(extract(&archive), "");
    }
}

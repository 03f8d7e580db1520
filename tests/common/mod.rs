//! Shared corpus fixtures for the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

/// Header-only finding aid (namespaced, with a DOCTYPE).
pub const HEADER_ONLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ead SYSTEM "ead.dtd">
<ead xmlns="urn:isbn:1-931666-22-9">
  <eadheader>
    <eadid countrycode="FR">FRAD001</eadid>
    <filedesc>
      <titlestmt><titleproper>Fonds Dupont</titleproper></titlestmt>
    </filedesc>
  </eadheader>
</ead>
"#;

/// Archival description without a header.
pub const DESCRIPTION_ONLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ead>
  <archdesc level="fonds">
    <did>
      <unittitle>Correspondance</unittitle>
      <unitdate normal="1850/1900">1850-1900</unitdate>
    </did>
    <scopecontent><p>Lettres.</p></scopecontent>
  </archdesc>
</ead>
"#;

/// Front matter only.
pub const FRONTMATTER_ONLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ead>
  <frontmatter>
    <titlepage>
      <titleproper>Inventaire</titleproper>
      <publisher>Archives</publisher>
      <date>2001</date>
    </titlepage>
  </frontmatter>
</ead>
"#;

pub const MALFORMED: &str = "<ead><archdesc><did></archdesc></ead>";

pub fn write(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, body).unwrap();
}

/// Six documents in three structurally identical pairs, sorted as
/// `a1, a2, b1, b2, c1, c2`.
pub fn write_three_pairs(dir: &Path) {
    write(dir, "a1.xml", HEADER_ONLY);
    write(dir, "a2.xml", HEADER_ONLY);
    write(dir, "b1.xml", DESCRIPTION_ONLY);
    write(dir, "b2.xml", DESCRIPTION_ONLY);
    write(dir, "c1.xml", FRONTMATTER_ONLY);
    write(dir, "c2.xml", FRONTMATTER_ONLY);
}

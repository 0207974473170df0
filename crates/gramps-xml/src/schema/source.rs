//! Sources, citations and repositories.

use crate::gramps_node;
use crate::schema::{Address, DateField, EntityMeta, Link, ObjRef, Url};
use crate::xml::Flag;

gramps_node! {
    /// A reference to a specific place within a source.
    pub struct Citation {
        embed meta: EntityMeta,
        embed date: DateField,
        text page: Option<String> = "page",
        text confidence: Option<String> = "confidence",
        many note_refs: Vec<Link> = "noteref",
        many obj_refs: Vec<ObjRef> = "objref",
        many attributes: Vec<SrcAttribute> = "srcattribute",
        one source_ref: Link = "sourceref",
        many tag_refs: Vec<Link> = "tagref",
    }
}

gramps_node! {
    /// A typed key/value pair on a source or citation.
    pub struct SrcAttribute {
        attr private: Flag = "priv",
        attr kind: String = "type",
        attr value: String = "value",
        many citation_refs: Vec<Link> = "citationref",
        many note_refs: Vec<Link> = "noteref",
    }
}

gramps_node! {
    /// A free-form key/value pair on a source.
    pub struct DataItem {
        attr key: String = "key",
        attr value: String = "value",
    }
}

gramps_node! {
    /// Where a source can be found.
    pub struct RepoRef {
        attr hlink: String = "hlink",
        attr private: Flag = "priv",
        attr callno: Option<String> = "callno",
        attr medium: Option<String> = "medium",
        many note_refs: Vec<Link> = "noteref",
    }
}

gramps_node! {
    pub struct Source {
        embed meta: EntityMeta,
        text title: Option<String> = "stitle",
        text author: Option<String> = "sauthor",
        text pub_info: Option<String> = "spubinfo",
        text abbrev: Option<String> = "sabbrev",
        many note_refs: Vec<Link> = "noteref",
        many obj_refs: Vec<ObjRef> = "objref",
        many attributes: Vec<SrcAttribute> = "srcattribute",
        many data_items: Vec<DataItem> = "data_item",
        many repo_refs: Vec<RepoRef> = "reporef",
        many tag_refs: Vec<Link> = "tagref",
    }
}

gramps_node! {
    /// An archive, library or website holding sources.
    pub struct Repository {
        embed meta: EntityMeta,
        text name: String = "rname",
        text kind: String = "type",
        many addresses: Vec<Address> = "address",
        many urls: Vec<Url> = "url",
        many note_refs: Vec<Link> = "noteref",
        many tag_refs: Vec<Link> = "tagref",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{decode_any, encode_node};

    #[test]
    fn test_citation_source_ref_is_required() {
        let citation = Citation::default();
        let xml = String::from_utf8(encode_node("citation", &citation).unwrap()).unwrap();
        assert_eq!(
            xml,
            "\n<citation handle=\"\" change=\"\">\n\t<sourceref hlink=\"\"/>\n</citation>"
        );
    }

    #[test]
    fn test_source_binding() {
        let source: Source = decode_any(
            br#"<source handle="_s1" change="1" id="S0001">
                  <stitle>Parish register</stitle>
                  <sauthor>St. Mary</sauthor>
                  <data_item key="volume" value="3"/>
                  <reporef hlink="_r1" medium="Book" callno="R-12"/>
                </source>"#,
        )
        .unwrap();
        assert_eq!(source.title.as_deref(), Some("Parish register"));
        assert_eq!(source.author.as_deref(), Some("St. Mary"));
        assert_eq!(source.data_items[0].key, "volume");
        assert_eq!(source.repo_refs[0].callno.as_deref(), Some("R-12"));
        assert!(source.unparsed.is_empty());
    }

    #[test]
    fn test_repository_keeps_every_url() {
        let repository: Repository = decode_any(
            br#"<repository handle="_r1" change="1">
                  <rname>Archive</rname>
                  <type>Library</type>
                  <url href="https://a.example"/>
                  <url href="https://b.example" type="Web Home"/>
                </repository>"#,
        )
        .unwrap();
        assert_eq!(repository.name, "Archive");
        assert_eq!(repository.urls.len(), 2);
        assert_eq!(repository.urls[1].kind.as_deref(), Some("Web Home"));
    }
}

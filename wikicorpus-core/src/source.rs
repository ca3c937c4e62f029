//! Forward-only stream of `<text>` blocks from a MediaWiki XML export
//!
//! Only elements named `text` in the export namespace are yielded. Nothing
//! else of a page is kept, and the event buffer is reused, so memory stays
//! flat no matter how many pages the dump holds.

use crate::config::defaults;
use crate::error::{BlockError, CorpusError, Result};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const TEXT_TAG: &[u8] = b"text";

/// Buffer for reading the dump file (1MB)
const READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Raw payload of one document unit, markup intact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    ordinal: u64,
    text: String,
}

impl RawBlock {
    pub fn new(ordinal: u64, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }

    /// 1-based position of the block in the stream
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

enum Step {
    Open,
    EmptyText,
    Eof,
    Skip,
}

/// Streaming reader over a MediaWiki dump
pub struct DumpSource<R: BufRead> {
    reader: NsReader<R>,
    namespace: Vec<u8>,
    buf: Vec<u8>,
    blocks_read: u64,
    finished: bool,
}

impl DumpSource<BufReader<File>> {
    /// Open an uncompressed dump file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::with_capacity(
            READ_BUFFER_SIZE,
            file,
        )))
    }
}

impl<R: BufRead> DumpSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: NsReader::from_reader(reader),
            namespace: defaults::EXPORT_NAMESPACE.as_bytes().to_vec(),
            buf: Vec::with_capacity(8192),
            blocks_read: 0,
            finished: false,
        }
    }

    /// Match `text` elements bound to this namespace URI instead
    pub fn with_namespace(mut self, uri: impl Into<String>) -> Self {
        self.namespace = uri.into().into_bytes();
        self
    }

    /// Number of `text` elements read so far, good or malformed
    pub fn blocks_read(&self) -> u64 {
        self.blocks_read
    }

    fn next_block(&mut self) -> Result<Option<RawBlock>> {
        loop {
            self.buf.clear();
            let step = {
                let (ns, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
                let in_namespace = matches!(
                    ns,
                    ResolveResult::Bound(Namespace(uri)) if uri == self.namespace.as_slice()
                );

                match event {
                    Event::Start(ref e) if in_namespace && e.local_name().as_ref() == TEXT_TAG => {
                        Step::Open
                    }
                    Event::Empty(ref e) if in_namespace && e.local_name().as_ref() == TEXT_TAG => {
                        Step::EmptyText
                    }
                    Event::Eof => Step::Eof,
                    _ => Step::Skip,
                }
            };

            match step {
                Step::Open => return self.read_text_body().map(Some),
                Step::EmptyText => {
                    self.blocks_read += 1;
                    return Ok(Some(RawBlock::new(self.blocks_read, String::new())));
                }
                Step::Eof => return Ok(None),
                Step::Skip => {}
            }
        }
    }

    /// Collect the content up to the matching end tag.
    ///
    /// A payload that cannot be unescaped or decoded is consumed in full and
    /// reported as a block error, so the stream stays usable.
    fn read_text_body(&mut self) -> Result<RawBlock> {
        let mut text = String::new();
        let mut malformed: Option<String> = None;
        let mut depth = 0usize;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Text(e) => match e.unescape() {
                    Ok(content) => text.push_str(&content),
                    Err(err) => {
                        malformed.get_or_insert_with(|| err.to_string());
                    }
                },
                Event::CData(e) => match std::str::from_utf8(&e) {
                    Ok(content) => text.push_str(content),
                    Err(err) => {
                        malformed.get_or_insert_with(|| err.to_string());
                    }
                },
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => break,
                Event::End(_) => depth -= 1,
                Event::Eof => {
                    return Err(CorpusError::Xml(
                        "unexpected end of stream inside <text>".into(),
                    ))
                }
                _ => {}
            }
        }

        self.blocks_read += 1;
        match malformed {
            Some(reason) => Err(BlockError::Markup(format!(
                "block {}: {reason}",
                self.blocks_read
            ))
            .into()),
            None => Ok(RawBlock::new(self.blocks_read, text)),
        }
    }
}

impl<R: BufRead> Iterator for DumpSource<R> {
    type Item = Result<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                if !e.is_block_level() {
                    log::warn!("dump stream ended with an error: {e}");
                    self.finished = true;
                }
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.10/" xml:lang="en">
  <siteinfo>
    <sitename>Wikipedia</sitename>
  </siteinfo>
  <page>
    <title>First</title>
    <ns>0</ns>
    <id>1</id>
    <revision>
      <id>10</id>
      <text xml:space="preserve">Alpha is '''bold''' &amp; &lt;ref&gt;cited&lt;/ref&gt; here.</text>
    </revision>
  </page>
  <page>
    <title>Second</title>
    <revision>
      <text xml:space="preserve" />
    </revision>
  </page>
  <page>
    <title>Third</title>
    <revision>
      <text><![CDATA[Raw <b>cdata</b>]]> tail</text>
    </revision>
  </page>
</mediawiki>
"#;

    fn blocks(xml: &str) -> Vec<Result<RawBlock>> {
        DumpSource::from_reader(Cursor::new(xml.as_bytes().to_vec())).collect()
    }

    #[test]
    fn test_yields_text_elements_in_order() {
        let blocks: Vec<RawBlock> = blocks(SAMPLE_XML)
            .into_iter()
            .map(|b| b.unwrap())
            .collect();

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].ordinal(), 1);
        assert_eq!(
            blocks[0].text(),
            "Alpha is '''bold''' & <ref>cited</ref> here."
        );
        assert_eq!(blocks[1].text(), "");
        assert_eq!(blocks[2].text(), "Raw <b>cdata</b> tail");
        assert_eq!(blocks[2].ordinal(), 3);
    }

    #[test]
    fn test_other_namespaces_are_ignored() {
        let xml = r#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.11/">
  <page><revision><text>Newer schema</text></revision></page>
</mediawiki>"#;
        assert!(blocks(xml).is_empty());

        let found: Vec<_> = DumpSource::from_reader(Cursor::new(xml.as_bytes().to_vec()))
            .with_namespace("http://www.mediawiki.org/xml/export-0.11/")
            .map(|b| b.unwrap().into_text())
            .collect();
        assert_eq!(found, vec!["Newer schema"]);
    }

    #[test]
    fn test_prefixed_foreign_text_is_ignored() {
        let xml = r#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.10/" xmlns:x="urn:other">
  <x:text>foreign</x:text>
  <page><revision><text>native</text></revision></page>
</mediawiki>"#;
        let found: Vec<_> = blocks(xml)
            .into_iter()
            .map(|b| b.unwrap().into_text())
            .collect();
        assert_eq!(found, vec!["native"]);
    }

    #[test]
    fn test_bad_entity_is_block_level() {
        let xml = r#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.10/">
  <page><revision><text>&lt;ref&gt;never closed &bogus; entity</text></revision></page>
  <page><revision><text>still readable</text></revision></page>
</mediawiki>"#;
        let results = blocks(xml);
        assert_eq!(results.len(), 2);

        let err = results[0].as_ref().unwrap_err();
        assert!(err.is_block_level());
        assert!(matches!(err, CorpusError::Block(BlockError::Markup(_))));

        let next = results[1].as_ref().unwrap();
        assert_eq!(next.ordinal(), 2);
        assert_eq!(next.text(), "still readable");
    }

    #[test]
    fn test_truncated_stream_is_fatal() {
        let xml = r#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.10/">
  <page><revision><text>cut off"#;
        let results = blocks(xml);
        assert_eq!(results.len(), 1);
        assert!(!results[0].as_ref().unwrap_err().is_block_level());
    }

    /// Produces `pages` pages lazily, never holding more than one in memory
    struct PageStream {
        remaining: usize,
        current: Vec<u8>,
        pos: usize,
    }

    impl Read for PageStream {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            if self.pos == self.current.len() {
                if self.remaining == 0 {
                    return Ok(0);
                }
                self.remaining -= 1;
                self.current = format!(
                    "<page><title>P{n}</title><revision><text>Page {n} says hello.</text></revision></page>\n",
                    n = self.remaining
                )
                .into_bytes();
                self.pos = 0;
            }
            let n = out.len().min(self.current.len() - self.pos);
            out[..n].copy_from_slice(&self.current[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    fn synthetic_dump(pages: usize) -> DumpSource<BufReader<impl Read>> {
        let header =
            Cursor::new(br#"<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.10/">"#.to_vec());
        let body = PageStream {
            remaining: pages,
            current: Vec::new(),
            pos: 0,
        };
        let footer = Cursor::new(b"</mediawiki>".to_vec());
        DumpSource::from_reader(BufReader::new(header.chain(body).chain(footer)))
    }

    #[test]
    fn test_buffer_does_not_grow_with_page_count() {
        let mut small = synthetic_dump(1_000);
        assert_eq!(small.by_ref().filter(|b| b.is_ok()).count(), 1_000);

        let mut large = synthetic_dump(10_000);
        assert_eq!(large.by_ref().filter(|b| b.is_ok()).count(), 10_000);

        assert_eq!(large.blocks_read(), 10_000);
        assert_eq!(small.buf.capacity(), large.buf.capacity());
    }
}

//! Code fragment output.
//!
//! Source code is tokenized by an external pretty-printer (the [`CodeParser`]
//! seam) that drives a [`CodeSink`]. [`CodeGenerator`] is the AsciiDoc sink:
//! it writes listing lines into a [`TextStream`], expanding tabs and turning
//! cross-references into `<<id,text>>` links.

use super::TextStream;
use crate::text::{anchor_id, block_delimiter, convert_to_asciidoc, strip_extension};

/// Languages known to the source highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceLanguage {
    #[default]
    Unknown,
    Idl,
    Java,
    CSharp,
    D,
    Php,
    ObjC,
    Cpp,
    JavaScript,
    Python,
    Fortran,
    Vhdl,
    Xml,
    Tcl,
    Markdown,
    Sql,
}

impl SourceLanguage {
    /// Maps a file extension (with or without leading dot) or file name.
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.rsplit('.').next().unwrap_or(ext).to_ascii_lowercase();
        match ext.as_str() {
            "idl" | "ddl" | "odl" => SourceLanguage::Idl,
            "java" => SourceLanguage::Java,
            "cs" => SourceLanguage::CSharp,
            "d" => SourceLanguage::D,
            "php" | "php4" | "php5" | "inc" | "phtml" => SourceLanguage::Php,
            "m" | "mm" => SourceLanguage::ObjC,
            "c" | "cc" | "cxx" | "cpp" | "c++" | "h" | "hh" | "hxx" | "hpp" | "h++" | "ii"
            | "ixx" | "ipp" | "inl" | "cu" | "cuh" => SourceLanguage::Cpp,
            "js" => SourceLanguage::JavaScript,
            "py" | "pyw" => SourceLanguage::Python,
            "f" | "for" | "f90" | "f95" | "f03" | "f08" => SourceLanguage::Fortran,
            "vhd" | "vhdl" => SourceLanguage::Vhdl,
            "xml" => SourceLanguage::Xml,
            "tcl" => SourceLanguage::Tcl,
            "md" | "markdown" => SourceLanguage::Markdown,
            "sql" => SourceLanguage::Sql,
            _ => SourceLanguage::Unknown,
        }
    }

    /// Language name understood by AsciiDoc source highlighters.
    pub fn highlighter_name(&self) -> &'static str {
        match self {
            SourceLanguage::Unknown => "",
            SourceLanguage::Idl => "idl",
            SourceLanguage::Java => "java",
            SourceLanguage::CSharp => "csharp",
            SourceLanguage::D => "d",
            SourceLanguage::Php => "php",
            SourceLanguage::ObjC => "objc",
            SourceLanguage::Cpp => "cpp",
            SourceLanguage::JavaScript => "js",
            SourceLanguage::Python => "python",
            SourceLanguage::Fortran => "fortran",
            SourceLanguage::Vhdl => "vhdl",
            SourceLanguage::Xml => "xml",
            SourceLanguage::Tcl => "tcl",
            SourceLanguage::Markdown => "markdown",
            SourceLanguage::Sql => "sql",
        }
    }

    /// Block attribute line for a listing in this language.
    pub fn source_attributes(&self, line_numbers: Option<u32>) -> String {
        let mut attrs = String::from("[source");
        let name = self.highlighter_name();
        if !name.is_empty() {
            attrs.push(',');
            attrs.push_str(name);
        }
        if let Some(start) = line_numbers {
            attrs.push_str(",linenums");
            if start > 1 {
                attrs.push_str(&format!(",start={}", start));
            }
        }
        attrs.push_str(",subs=\"+macros\"]");
        attrs
    }
}

/// A piece of code handed to the pretty-printer.
#[derive(Debug, Clone, Copy)]
pub struct CodeFragment<'a> {
    pub text: &'a str,
    pub language: SourceLanguage,
    /// Line number of the first line.
    pub start_line: u32,
    pub line_numbers: bool,
}

impl<'a> CodeFragment<'a> {
    pub fn new(text: &'a str, language: SourceLanguage) -> Self {
        Self {
            text,
            language,
            start_line: 1,
            line_numbers: false,
        }
    }

    pub fn with_line_numbers(mut self, start_line: u32) -> Self {
        self.start_line = start_line;
        self.line_numbers = true;
        self
    }
}

/// Receiver of pretty-printer output.
pub trait CodeSink {
    /// Writes code text.
    fn codify(&mut self, text: &str);
    /// Writes a symbol that links to its documentation.
    fn write_code_link(&mut self, file: &str, anchor: &str, name: &str);
    fn write_line_number(&mut self, line: u32);
    fn start_code_line(&mut self);
    fn end_code_line(&mut self);
    fn start_font_class(&mut self, class: &str);
    fn end_font_class(&mut self);
    /// Closes an unterminated line.
    fn finish(&mut self);
}

/// Source-code pretty-printer.
pub trait CodeParser {
    fn parse_code(&self, sink: &mut dyn CodeSink, fragment: &CodeFragment<'_>);
}

/// Fallback pretty-printer: emits the code line by line without links.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainCodeParser;

impl CodeParser for PlainCodeParser {
    fn parse_code(&self, sink: &mut dyn CodeSink, fragment: &CodeFragment<'_>) {
        let text = fragment.text.strip_suffix('\n').unwrap_or(fragment.text);
        for (i, line) in text.split('\n').enumerate() {
            sink.start_code_line();
            if fragment.line_numbers {
                sink.write_line_number(fragment.start_line + i as u32);
            }
            sink.codify(line.strip_suffix('\r').unwrap_or(line));
            sink.end_code_line();
        }
        sink.finish();
    }
}

/// AsciiDoc [`CodeSink`] writing into a listing block.
#[derive(Debug)]
pub struct CodeGenerator<'a> {
    out: &'a mut TextStream,
    tab_size: usize,
    col: usize,
    inside_code_line: bool,
    inside_special_hl: bool,
    delimiter: String,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(out: &'a mut TextStream, tab_size: usize) -> Self {
        Self {
            out,
            tab_size: tab_size.max(1),
            col: 0,
            inside_code_line: false,
            inside_special_hl: false,
            delimiter: String::from("----"),
        }
    }

    /// Opens a listing block for `fragment`.
    ///
    /// The block delimiter is chosen so that no line of the fragment closes
    /// the block early.
    pub fn start_code_fragment(&mut self, fragment: &CodeFragment<'_>) {
        let line_numbers = fragment.line_numbers.then_some(fragment.start_line);
        self.delimiter = block_delimiter(fragment.text, '-');
        self.out.ensure_newline();
        self.out.endl();
        self.out.push_str(&fragment.language.source_attributes(line_numbers));
        self.out.endl();
        self.out.push_str(&self.delimiter);
        self.out.endl();
    }

    /// Closes a listing block.
    pub fn end_code_fragment(&mut self) {
        self.finish();
        self.out.ensure_newline();
        self.out.push_str(&self.delimiter);
        self.out.push_str("\n\n");
    }

    /// Current column within the line being written.
    pub fn column(&self) -> usize {
        self.col
    }

    /// Whether a highlighting class is open.
    pub fn in_font_class(&self) -> bool {
        self.inside_special_hl
    }
}

impl CodeSink for CodeGenerator<'_> {
    fn codify(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\t' => {
                    let spaces = self.tab_size - (self.col % self.tab_size);
                    for _ in 0..spaces {
                        self.out.push(' ');
                    }
                    self.col += spaces;
                }
                '\u{7}' => {
                    self.out.push_str("^G");
                    self.col += 1;
                }
                '\u{c}' => {
                    self.out.push_str("^L");
                    self.col += 1;
                }
                _ => {
                    self.out.push(c);
                    self.col += 1;
                }
            }
        }
    }

    fn write_code_link(&mut self, file: &str, anchor: &str, name: &str) {
        let id = anchor_id(strip_extension(file), anchor);
        self.out.push_str("<<");
        self.out.push_str(&id);
        self.out.push(',');
        self.out.push_str(&convert_to_asciidoc(name));
        self.out.push_str(">>");
        self.col += name.chars().count();
    }

    fn write_line_number(&mut self, _line: u32) {
        // numbering comes from the block's linenums attribute
        self.inside_code_line = true;
    }

    fn start_code_line(&mut self) {
        self.inside_code_line = true;
        self.col = 0;
    }

    fn end_code_line(&mut self) {
        self.out.endl();
        self.inside_code_line = false;
    }

    fn start_font_class(&mut self, _class: &str) {
        self.inside_special_hl = true;
    }

    fn end_font_class(&mut self) {
        self.inside_special_hl = false;
    }

    fn finish(&mut self) {
        if self.inside_code_line {
            self.end_code_line();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_expansion_follows_column() {
        let mut out = TextStream::new();
        let mut code = CodeGenerator::new(&mut out, 4);
        code.start_code_line();
        code.codify("ab\tc\td");
        code.end_code_line();
        assert_eq!(out.as_str(), "ab  c   d\n");
    }

    #[test]
    fn test_control_characters() {
        let mut out = TextStream::new();
        let mut code = CodeGenerator::new(&mut out, 4);
        code.codify("x\u{7}y\u{c}");
        assert_eq!(code.column(), 4);
        assert_eq!(out.as_str(), "x^Gy^L");
    }

    #[test]
    fn test_code_link() {
        let mut out = TextStream::new();
        let mut code = CodeGenerator::new(&mut out, 4);
        code.write_code_link("classfoo.xml", "a12", "Foo_bar");
        assert_eq!(code.column(), 7);
        assert_eq!(out.as_str(), "<<classfoo_1a12,Foo&#95;bar>>");
    }

    #[test]
    fn test_plain_parser_with_fragment() {
        let mut out = TextStream::new();
        let mut code = CodeGenerator::new(&mut out, 4);
        let fragment = CodeFragment::new("int a;\nint b;\n", SourceLanguage::Cpp).with_line_numbers(10);
        code.start_code_fragment(&fragment);
        PlainCodeParser.parse_code(&mut code, &fragment);
        code.end_code_fragment();
        assert_eq!(
            out.as_str(),
            "\n[source,cpp,linenums,start=10,subs=\"+macros\"]\n----\nint a;\nint b;\n----\n\n"
        );
    }

    #[test]
    fn test_fragment_with_delimiter_line() {
        let mut out = TextStream::new();
        let mut code = CodeGenerator::new(&mut out, 4);
        let fragment = CodeFragment::new("/*\n----\n*/\n", SourceLanguage::Cpp);
        code.start_code_fragment(&fragment);
        PlainCodeParser.parse_code(&mut code, &fragment);
        code.end_code_fragment();
        assert_eq!(
            out.as_str(),
            "\n[source,cpp,subs=\"+macros\"]\n-----\n/*\n----\n*/\n-----\n\n"
        );
    }

    #[test]
    fn test_finish_closes_open_line() {
        let mut out = TextStream::new();
        let mut code = CodeGenerator::new(&mut out, 4);
        code.start_code_line();
        code.codify("x");
        code.finish();
        code.finish();
        assert_eq!(out.as_str(), "x\n");
    }

    #[test]
    fn test_language_mapping() {
        assert_eq!(SourceLanguage::from_extension(".hpp"), SourceLanguage::Cpp);
        assert_eq!(SourceLanguage::from_extension("script.py"), SourceLanguage::Python);
        assert_eq!(SourceLanguage::from_extension("zzz"), SourceLanguage::Unknown);
        assert_eq!(
            SourceLanguage::Unknown.source_attributes(None),
            "[source,subs=\"+macros\"]"
        );
    }
}

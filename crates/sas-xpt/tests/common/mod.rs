//! In-test builder for transport file bytes.

#![allow(dead_code)]

use sas_xpt::float::ieee_to_ibm;

const RECORD_LEN: usize = 80;

/// Value written into an observation.
#[derive(Debug, Clone)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// Missing value with the given marker byte (`.`, `_`, `A`-`Z`).
    Missing(u8),
}

#[derive(Debug, Clone)]
pub struct Var {
    pub name: &'static str,
    pub label: &'static str,
    pub format: &'static str,
    pub numeric: bool,
    pub length: usize,
}

impl Var {
    pub fn text(name: &'static str, length: usize) -> Self {
        Self {
            name,
            label: "",
            format: "",
            numeric: false,
            length,
        }
    }

    pub fn number(name: &'static str, format: &'static str) -> Self {
        Self {
            name,
            label: "",
            format,
            numeric: true,
            length: 8,
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

/// Describes one single-member transport file.
#[derive(Debug, Clone)]
pub struct XptFixture {
    pub v8: bool,
    pub name: &'static str,
    pub label: &'static str,
    pub vars: Vec<Var>,
    pub rows: Vec<Vec<Cell>>,
    /// Emit a LABELV8 section for labels longer than 40 characters.
    pub long_labels: bool,
}

impl XptFixture {
    pub fn v5(name: &'static str, vars: Vec<Var>) -> Self {
        Self {
            v8: false,
            name,
            label: "",
            vars,
            rows: Vec::new(),
            long_labels: false,
        }
    }

    pub fn v8(name: &'static str, vars: Vec<Var>) -> Self {
        Self {
            v8: true,
            ..Self::v5(name, vars)
        }
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    pub fn row(mut self, cells: Vec<Cell>) -> Self {
        self.rows.push(cells);
        self
    }

    pub fn with_long_labels(mut self) -> Self {
        self.long_labels = true;
        self
    }

    fn obs_len(&self) -> usize {
        self.vars.iter().map(|v| v.length).sum()
    }

    /// Header records plus observations, without trailing padding.
    pub fn unpadded(&self) -> Vec<u8> {
        let mut out = self.headers();
        for row in &self.rows {
            out.extend(self.observation(row));
        }
        out
    }

    /// Complete file, padded with blanks to an 80-byte boundary.
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.unpadded();
        let padded = out.len().div_ceil(RECORD_LEN) * RECORD_LEN;
        out.resize(padded, b' ');
        out
    }

    fn headers(&self) -> Vec<u8> {
        let (lib, mem, dsc, nam, obs) = if self.v8 {
            ("LIBV8   ", "MEMBV8  ", "DSCPTV8 ", "NAMSTV8 ", "OBSV8   ")
        } else {
            ("LIBRARY ", "MEMBER  ", "DSCRPTR ", "NAMESTR ", "OBS     ")
        };

        let mut out = Vec::new();
        out.extend(header(lib, "000000000000000000000000000000  "));
        out.extend(text_record(&[(0, "SAS"), (8, "SAS"), (16, "SASLIB"), (24, "9.4"), (32, "X64_10PR"), (64, "01JAN20:00:00:00")]));
        out.extend(text_record(&[(0, "01JAN20:00:00:00")]));
        out.extend(header(mem, "000000000000000001600000000140  "));
        out.extend(header(dsc, "000000000000000000000000000000  "));

        let name_width = if self.v8 { 32 } else { 8 };
        let mut member_data = text_record(&[(0, "SAS"), (64, "01JAN20:00:00:00")]);
        put(&mut member_data, 8, self.name, name_width);
        put(&mut member_data, 8 + name_width, "SASDATA", 8);
        out.extend(member_data);
        out.extend(text_record(&[(0, "01JAN20:00:00:00"), (32, self.label), (72, "DATA")]));

        let count = if self.v8 {
            format!("{:06}", self.vars.len())
        } else {
            format!("{:04}", self.vars.len())
        };
        out.extend(header(nam, &format!("000000{count}")));

        let mut namestrs = Vec::new();
        let mut position = 0usize;
        for (idx, var) in self.vars.iter().enumerate() {
            namestrs.extend(self.namestr(var, idx, position));
            position += var.length;
        }
        namestrs.resize(namestrs.len().div_ceil(RECORD_LEN) * RECORD_LEN, b' ');
        out.extend(namestrs);

        if self.v8 && self.long_labels {
            let long: Vec<(usize, &Var)> = self
                .vars
                .iter()
                .enumerate()
                .filter(|(_, v)| v.label.len() > 40)
                .collect();
            out.extend(header("LABELV8 ", &format!("{}", long.len())));
            let mut section = Vec::new();
            for (idx, var) in long {
                section.extend(((idx + 1) as i16).to_be_bytes());
                section.extend((var.name.len() as i16).to_be_bytes());
                section.extend((var.label.len() as i16).to_be_bytes());
                section.extend(var.name.as_bytes());
                section.extend(var.label.as_bytes());
            }
            section.resize(section.len().div_ceil(RECORD_LEN) * RECORD_LEN, b' ');
            out.extend(section);
        }

        out.extend(header(obs, "000000000000000000000000000000  "));
        out
    }

    fn namestr(&self, var: &Var, idx: usize, position: usize) -> Vec<u8> {
        let mut buf = vec![0u8; 140];
        let ntype: i16 = if var.numeric { 1 } else { 2 };
        buf[0..2].copy_from_slice(&ntype.to_be_bytes());
        buf[4..6].copy_from_slice(&(var.length as i16).to_be_bytes());
        buf[6..8].copy_from_slice(&((idx + 1) as i16).to_be_bytes());
        put(&mut buf, 8, var.name, 8);
        put(&mut buf, 16, var.label, 40);
        put(&mut buf, 56, var.format, 8);
        put(&mut buf, 72, "", 8);
        buf[84..88].copy_from_slice(&(position as i32).to_be_bytes());
        if self.v8 {
            put(&mut buf, 88, var.name, 32);
        }
        buf
    }

    fn observation(&self, row: &[Cell]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.obs_len());
        for (var, cell) in self.vars.iter().zip(row) {
            match cell {
                Cell::Text(text) => {
                    let mut field = vec![b' '; var.length];
                    field[..text.len()].copy_from_slice(text.as_bytes());
                    out.extend(field);
                }
                Cell::Number(value) => out.extend(&ieee_to_ibm(*value)[..var.length]),
                Cell::Missing(marker) => {
                    let mut field = vec![0u8; var.length];
                    field[0] = *marker;
                    out.extend(field);
                }
            }
        }
        out
    }
}

fn header(kind: &str, rest: &str) -> Vec<u8> {
    let mut record = vec![b' '; RECORD_LEN];
    let prefix = format!("HEADER RECORD*******{kind}HEADER RECORD!!!!!!!");
    record[..48].copy_from_slice(prefix.as_bytes());
    record[48..48 + rest.len()].copy_from_slice(rest.as_bytes());
    record
}

fn text_record(fields: &[(usize, &str)]) -> Vec<u8> {
    let mut record = vec![b' '; RECORD_LEN];
    for (offset, text) in fields {
        record[*offset..*offset + text.len()].copy_from_slice(text.as_bytes());
    }
    record
}

fn put(buf: &mut [u8], offset: usize, text: &str, width: usize) {
    let field = &mut buf[offset..offset + width];
    field.fill(b' ');
    let len = text.len().min(width);
    field[..len].copy_from_slice(&text.as_bytes()[..len]);
}

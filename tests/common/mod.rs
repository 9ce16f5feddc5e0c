#![allow(dead_code)]

use reportdef::{EngineOutput, EngineRequest, RenderEngine, RenderError};
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const NAMESPACE: &str =
    "http://schemas.microsoft.com/sqlserver/reporting/2010/01/reportdefinition";

/// A sales report: one body dataset filtered by region and year, a lookup
/// dataset of regions and an inline list of statuses.
pub const SALES_REPORT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Report xmlns="http://schemas.microsoft.com/sqlserver/reporting/2010/01/reportdefinition">
  <DataSources>
    <DataSource Name="Main"><ConnectionProperties><DataProvider>SQL</DataProvider></ConnectionProperties></DataSource>
  </DataSources>
  <DataSets>
    <DataSet Name="Sales">
      <Query>
        <DataSourceName>Main</DataSourceName>
        <CommandText>SELECT Region, Total FROM Sales
          WHERE (@Regions LIKE '%,' || Region || ',%') AND Year = @Year
          ORDER BY Total</CommandText>
      </Query>
    </DataSet>
    <DataSet Name="Regions">
      <Query><CommandText>SELECT Code, Name FROM Regions ORDER BY Code</CommandText></Query>
    </DataSet>
  </DataSets>
  <ReportParameters>
    <ReportParameter Name="Regions">
      <DataType>String</DataType>
      <Prompt>Regions</Prompt>
      <MultiValue>true</MultiValue>
      <ValidValues>
        <DataSetReference>
          <DataSetName>Regions</DataSetName>
          <ValueField>Code</ValueField>
          <LabelField>Name</LabelField>
        </DataSetReference>
      </ValidValues>
    </ReportParameter>
    <ReportParameter Name="Year">
      <DataType>Integer</DataType>
      <Prompt>Year</Prompt>
    </ReportParameter>
    <ReportParameter Name="Status">
      <DataType>String</DataType>
      <Prompt>Status</Prompt>
      <Nullable>true</Nullable>
      <ValidValues>
        <ParameterValues>
          <ParameterValue><Value>O</Value><Label>Open</Label></ParameterValue>
          <ParameterValue><Value>C</Value><Label>Closed</Label></ParameterValue>
        </ParameterValues>
      </ValidValues>
    </ReportParameter>
    <ReportParameter Name="Comment">
      <DataType>String</DataType>
      <Prompt>Comment</Prompt>
      <AllowBlank>true</AllowBlank>
    </ReportParameter>
  </ReportParameters>
  <Body><ReportItems /></Body>
</Report>"#;

/// An in-memory database matching [`SALES_REPORT`].
pub fn sales_db() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(
        "CREATE TABLE Regions (Code TEXT, Name TEXT);
         INSERT INTO Regions VALUES ('N', 'North'), ('S', 'South'), ('E', 'East');
         CREATE TABLE Sales (Region TEXT, Year INTEGER, Total INTEGER);
         INSERT INTO Sales VALUES ('N', 2024, 30), ('S', 2024, 10), ('E', 2024, 20),
                                  ('N', 2023, 99);",
    )
    .expect("seed sales database");
    conn
}

/// Engine double that records what it was given and answers with fixed bytes.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    pub definition: Rc<RefCell<Option<Vec<u8>>>>,
    pub requests: Rc<RefCell<Vec<EngineRequest>>>,
    pub released: Rc<RefCell<bool>>,
}

impl RenderEngine for RecordingEngine {
    fn load_definition(&mut self, definition: &[u8]) -> Result<(), RenderError> {
        *self.definition.borrow_mut() = Some(definition.to_vec());
        Ok(())
    }

    fn render(&mut self, request: &EngineRequest) -> Result<EngineOutput, RenderError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(EngineOutput {
            content: b"rendered".to_vec(),
            mime_type: request.format.mime_type().to_string(),
            file_name_extension: request.format.file_extension().to_string(),
            warnings: vec!["font substituted".to_string()],
            ..Default::default()
        })
    }

    fn release(&mut self) {
        *self.released.borrow_mut() = true;
    }
}

/// Decodes UTF-16LE CSV output after checking its byte-order mark.
pub fn decode_csv(bytes: &[u8]) -> String {
    assert_eq!(&bytes[..2], &[0xFF, 0xFE], "missing UTF-16LE byte-order mark");
    let units: Vec<u16> = bytes[2..].chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect();
    String::from_utf16(&units).expect("valid UTF-16")
}

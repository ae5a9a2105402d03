use php_array_parser::from_str;
use serde_derive::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct Config {
    dbms: String,
    port: Option<u16>,
    #[serde(default)]
    extensions: Vec<String>,
    acl: BTreeMap<String, bool>,
}

fn main() -> miette::Result<()> {
    let config: Config = from_str(
        r#"array(
            'dbms' => 'mysqli',
            'port' => $env_port, // resolved at runtime
            'extensions' => ['gallery', 'calendar'],
            'acl' => ['read' => true, 'write' => false],
        );"#,
    )?;

    println!("{:#?}", config);
    Ok(())
}

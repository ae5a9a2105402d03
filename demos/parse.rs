use php_array_parser::parse_literal;

fn main() -> miette::Result<()> {
    let source = r###"
    array (
        "double" => "quote",
        'single' => 'quote',
        "escaped" => "\"quote\"",
        1 => 2,
        "nested" => [
            "sub" => "key",
        ],
        "array" => [1,2,3,4],
        "bool" => false,
        "negative" => -1,
        "null" => null,
        "runtime" => $config['runtime'],
    )
    "###;

    let value = parse_literal(source)?;
    println!("{:#?}", value);
    println!("{}", value);
    Ok(())
}

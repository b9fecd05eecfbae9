// Session command parsing

/// One line typed at the `>>>` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    ClearScreen,
    Help,
    ShowAll,
    Delete,
    Save,
    /// All digits: edit the product at that position
    Modify(usize),
    /// `name=price`, price still unparsed
    Add { name: String, price: String },
    Search(String),
    Empty,
    Invalid(String),
}

pub const HELP: &[(&str, &str)] = &[
    ("/help", "Display this help menu"),
    ("/exit", "Quit program"),
    ("/clrscr", "Clear screen"),
    ("/all", "Show all products"),
    ("/del", "Delete a product"),
    ("/save", "Save all products down to disk"),
    ("[index]", "Display and edit the product at index"),
    ("[query_name]", "Search products with similar name"),
    ("[product_name]=[product_price]", "Add product"),
];

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();

    match line {
        "" => return Command::Empty,
        "/exit" => return Command::Exit,
        "/clrscr" => return Command::ClearScreen,
        "/help" => return Command::Help,
        "/all" => return Command::ShowAll,
        "/del" => return Command::Delete,
        "/save" => return Command::Save,
        _ => {}
    }

    if line.chars().all(|c| c.is_ascii_digit()) {
        return match line.parse() {
            Ok(index) => Command::Modify(index),
            Err(_) => Command::Invalid(line.to_string()),
        };
    }

    if line.contains('=') {
        let parts: Vec<&str> = line.split('=').collect();
        return match parts.as_slice() {
            [name, price] => Command::Add {
                name: name.to_string(),
                price: price.to_string(),
            },
            _ => Command::Invalid(line.to_string()),
        };
    }

    Command::Search(line.to_string())
}

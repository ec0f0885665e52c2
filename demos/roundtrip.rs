use foi_core::{parse, serialize};

fn main() {
    let foi_data = "Input File for D-Foundations : Bearing Piles
COMPANY    : Deltares
[INPUT DATA]
[MODEL]
   0 : Bearing piles
   1 : Is rigid = TRUE
[END OF MODEL]
[CALCULATIONTYPE]
  0 : Main calculationtype
  2 : Sub calculationtype
[END OF CALCULATIONTYPE]
[END OF INPUT DATA]
";

    match parse(foi_data) {
        Ok(document) => {
            match document.to_json() {
                Ok(json_output) => println!("Parsed .foi to JSON:\n{json_output}"),
                Err(e) => eprintln!("Failed to render JSON: {e}"),
            }
            match serialize(&document) {
                Ok(text) if text == foi_data => println!("Round trip reproduced the input exactly."),
                Ok(text) => println!("Round trip changed the input:\n{text}"),
                Err(e) => eprintln!("Failed to serialize: {e:?}"),
            }
        }
        Err(e) => {
            eprintln!("Failed to parse .foi: {:?}", miette::Report::new(e));
        }
    }
}

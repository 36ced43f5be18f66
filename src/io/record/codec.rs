use std::io::{BufRead, Write};

use chrono::NaiveDate;

use crate::conf::CodecConfig;
use crate::core::FlooringError;
use crate::model::money::{format2, parse_decimal};
use crate::model::{Order, Product, StateTax};

use super::format::{DELIMITER, FIELD_COUNT, HEADER, field};

/// Converts orders to and from single delimited text lines.
///
/// The order date is not part of a line: partition files carry it in their
/// name, so decoding takes it from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordCodec {
    comma_escape: char,
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

impl RecordCodec {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            comma_escape: config.comma_escape,
        }
    }

    pub fn header(&self) -> &'static str {
        HEADER
    }

    pub fn encode(&self, order: &Order) -> Result<String, FlooringError> {
        let number = order
            .number()
            .ok_or(FlooringError::MissingField("order number"))?;
        order.check_amounts()?;

        let name = order.customer_name();
        if name.contains(self.comma_escape) || name.contains(['\n', '\r']) {
            return Err(FlooringError::MalformedData(format!(
                "customer name '{}' cannot be stored: it contains '{}' or a line break",
                name, self.comma_escape
            )));
        }
        let state = &order.state_tax().abbreviation;
        let product_type = &order.product().product_type;
        for (label, value) in [("state", state), ("product type", product_type)] {
            if value.contains([DELIMITER, '\n', '\r']) {
                return Err(FlooringError::MalformedData(format!(
                    "{} '{}' cannot be stored: it contains a delimiter or line break",
                    label, value
                )));
            }
        }

        let fields: [String; FIELD_COUNT] = [
            number.to_string(),
            name.replace(DELIMITER, &self.comma_escape.to_string()),
            state.clone(),
            format2(order.state_tax().tax_rate),
            product_type.clone(),
            format2(order.area()),
            format2(order.product().cost_per_area),
            format2(order.product().labor_cost_per_area),
            format2(order.material_cost()),
            format2(order.labor_cost()),
            format2(order.tax()),
            format2(order.total()),
        ];
        Ok(fields.join(DELIMITER.to_string().as_str()))
    }

    /// Decodes one line. The tax snapshot comes back with the placeholder
    /// state name.
    pub fn decode(&self, line: &str, date: NaiveDate) -> Result<Order, FlooringError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let parts: Vec<&str> = line.split(DELIMITER).collect();
        if parts.len() != FIELD_COUNT {
            return Err(FlooringError::MalformedData(format!(
                "order line requires {} fields, but received {}",
                FIELD_COUNT,
                parts.len()
            )));
        }

        let number = parts[field::ORDER_NUMBER]
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                FlooringError::MalformedData(format!(
                    "invalid order number '{}'",
                    parts[field::ORDER_NUMBER]
                ))
            })?;
        let customer_name = parts[field::CUSTOMER_NAME].replace(self.comma_escape, ",");
        let tax_rate = parse_decimal(parts[field::TAX_RATE])?;
        let area = parse_decimal(parts[field::AREA])?;
        let cost_per_area = parse_decimal(parts[field::COST_PER_AREA])?;
        let labor_cost_per_area = parse_decimal(parts[field::LABOR_COST_PER_AREA])?;

        let order = Order::builder()
            .date(date)
            .number(number)
            .customer_name(customer_name)
            .area(area)
            .product(Product::new(
                parts[field::PRODUCT_TYPE],
                cost_per_area,
                labor_cost_per_area,
            ))
            .state_tax(StateTax::unresolved(parts[field::STATE], tax_rate))
            .build()?;
        order.check_amounts()?;
        Ok(order)
    }

    /// Writes the header followed by one line per order.
    pub fn write_records<'a>(
        &self,
        w: &mut impl Write,
        orders: impl IntoIterator<Item = &'a Order>,
    ) -> Result<usize, FlooringError> {
        writeln!(w, "{}", HEADER)?;
        let mut written = 0;
        for order in orders {
            writeln!(w, "{}", self.encode(order)?)?;
            written += 1;
        }
        w.flush()?;
        Ok(written)
    }

    /// Reads every order after the header line. Blank lines are skipped.
    pub fn read_records(
        &self,
        r: impl BufRead,
        date: NaiveDate,
    ) -> Result<Vec<Order>, FlooringError> {
        let mut orders = Vec::new();
        for (idx, line) in r.lines().enumerate() {
            let line = line?;
            if idx == 0 || line.trim().is_empty() {
                continue;
            }
            let order = self.decode(&line, date).map_err(|e| match e {
                FlooringError::MalformedData(msg) => {
                    FlooringError::MalformedData(format!("line {}: {}", idx + 1, msg))
                }
                other => other,
            })?;
            orders.push(order);
        }
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ADA_LINE: &str =
        "1,Ada Lovelace,CA,25.00,Tile,249.00,3.50,4.15,871.50,1033.35,476.21,2381.06";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2013, 6, 1).unwrap()
    }

    #[test]
    fn test_decode_known_line() {
        let codec = RecordCodec::default();
        let order = codec.decode(ADA_LINE, date()).unwrap();
        assert_eq!(order.number(), Some(1));
        assert_eq!(order.customer_name(), "Ada Lovelace");
        assert_eq!(order.area(), dec!(249.00));
        assert_eq!(order.state_tax(), &StateTax::unresolved("CA", dec!(25.00)));
        assert_eq!(order.product(), &Product::new("Tile", dec!(3.50), dec!(4.15)));
        assert_eq!(order.material_cost(), dec!(871.50));
        assert_eq!(order.labor_cost(), dec!(1033.35));
        assert_eq!(order.tax(), dec!(476.21));
        assert_eq!(order.total(), dec!(2381.06));
    }

    #[test]
    fn test_encode_matches_file_layout() {
        let codec = RecordCodec::default();
        let order = codec.decode(ADA_LINE, date()).unwrap();
        assert_eq!(codec.encode(&order).unwrap(), ADA_LINE);
    }

    #[test]
    fn test_decode_eleven_fields_is_malformed() {
        let codec = RecordCodec::default();
        let line = "1,Ada Lovelace,CA,25.00,Tile,249.00,3.50,4.15,871.50,1033.35,476.21";
        let err = codec.decode(line, date()).unwrap_err();
        assert_eq!(
            err,
            FlooringError::MalformedData(
                "order line requires 12 fields, but received 11".to_string()
            )
        );
    }

    #[test]
    fn test_decode_bad_number_is_malformed() {
        let codec = RecordCodec::default();
        let line = ADA_LINE.replace("249.00", "lots");
        assert!(matches!(
            codec.decode(&line, date()),
            Err(FlooringError::MalformedData(_))
        ));
        let line = ADA_LINE.replacen('1', "0", 1);
        assert!(matches!(
            codec.decode(&line, date()),
            Err(FlooringError::MalformedData(_))
        ));
    }

    #[test]
    fn test_decode_rejects_amounts_too_large_to_total() {
        let codec = RecordCodec::default();
        let line = ADA_LINE.replace("249.00", "79228162514264337593543950335");
        assert!(matches!(
            codec.decode(&line, date()),
            Err(FlooringError::MalformedData(msg)) if msg.contains("too large")
        ));
        let data = format!("{}\n{}\n", HEADER, line);
        assert!(codec.read_records(data.as_bytes(), date()).is_err());
    }

    #[test]
    fn test_encode_rejects_amounts_too_large_to_total() {
        let codec = RecordCodec::default();
        let order = codec
            .decode(ADA_LINE, date())
            .unwrap()
            .with_area(rust_decimal::Decimal::MAX);
        assert!(matches!(
            codec.encode(&order),
            Err(FlooringError::MalformedData(_))
        ));
    }

    #[test]
    fn test_decode_rounds_half_up() {
        let codec = RecordCodec::default();
        let line = "7,Bo,CA,25.005,Tile,100.125,3.5,4.1,0,0,0,0";
        let order = codec.decode(line, date()).unwrap();
        assert_eq!(order.state_tax().tax_rate.to_string(), "25.01");
        assert_eq!(order.area().to_string(), "100.13");
        assert_eq!(order.product().cost_per_area.to_string(), "3.50");
    }

    #[test]
    fn test_comma_in_name_is_escaped() {
        let codec = RecordCodec::default();
        let order = codec
            .decode(ADA_LINE, date())
            .unwrap()
            .with_customer_name("Lovelace, Ada");
        let line = codec.encode(&order).unwrap();
        assert!(line.starts_with("1,Lovelace# Ada,CA,"));
        let back = codec.decode(&line, date()).unwrap();
        assert_eq!(back.customer_name(), "Lovelace, Ada");
    }

    #[test]
    fn test_custom_escape_character() {
        let codec = RecordCodec::new(&CodecConfig { comma_escape: '|' });
        let order = codec
            .decode(ADA_LINE, date())
            .unwrap()
            .with_customer_name("Acme, Inc.");
        let line = codec.encode(&order).unwrap();
        assert!(line.contains("Acme| Inc."));
        assert_eq!(
            codec.decode(&line, date()).unwrap().customer_name(),
            "Acme, Inc."
        );
    }

    #[test]
    fn test_encode_rejects_unassigned_number() {
        let codec = RecordCodec::default();
        let draft = Order::builder()
            .date(date())
            .customer_name("Ada")
            .area(dec!(100))
            .product(Product::new("Tile", dec!(3.50), dec!(4.15)))
            .state_tax(StateTax::new("CA", "California", dec!(25)))
            .build()
            .unwrap();
        assert_eq!(
            codec.encode(&draft),
            Err(FlooringError::MissingField("order number"))
        );
    }

    #[test]
    fn test_encode_rejects_escape_char_in_name() {
        let codec = RecordCodec::default();
        let order = codec
            .decode(ADA_LINE, date())
            .unwrap()
            .with_customer_name("Ada #1");
        assert!(matches!(
            codec.encode(&order),
            Err(FlooringError::MalformedData(_))
        ));
    }

    #[test]
    fn test_read_records_skips_header() {
        let codec = RecordCodec::default();
        let data = format!("{}\n{}\n\n", HEADER, ADA_LINE);
        let orders = codec.read_records(data.as_bytes(), date()).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].date(), date());
    }

    #[test]
    fn test_read_records_reports_line() {
        let codec = RecordCodec::default();
        let data = format!("{}\n{}\n1,broken\n", HEADER, ADA_LINE);
        let err = codec.read_records(data.as_bytes(), date()).unwrap_err();
        assert_eq!(
            err,
            FlooringError::MalformedData(
                "line 3: order line requires 12 fields, but received 2".to_string()
            )
        );
    }

    #[test]
    fn test_write_records_header_only() {
        let codec = RecordCodec::default();
        let mut buf = Vec::new();
        let written = codec.write_records(&mut buf, []).unwrap();
        assert_eq!(written, 0);
        assert_eq!(String::from_utf8(buf).unwrap(), format!("{}\n", HEADER));
    }
}

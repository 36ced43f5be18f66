pub(crate) const DELIMITER: char = ',';
pub(crate) const FIELD_COUNT: usize = 12;
pub const HEADER: &str = "OrderNumber,CustomerName,State,TaxRate,ProductType,Area,\
CostPerSquareFoot,LaborCostPerSquareFoot,MaterialCost,LaborCost,Tax,Total";

/// Column positions within one order line. The last four are derived values
/// that are written for readers of the file but ignored on decode.
pub(crate) mod field {
    pub const ORDER_NUMBER: usize = 0;
    pub const CUSTOMER_NAME: usize = 1;
    pub const STATE: usize = 2;
    pub const TAX_RATE: usize = 3;
    pub const PRODUCT_TYPE: usize = 4;
    pub const AREA: usize = 5;
    pub const COST_PER_AREA: usize = 6;
    pub const LABOR_COST_PER_AREA: usize = 7;
}

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::core::{ErrorKind, FlooringError};
use crate::io::catalog::Catalog;
use crate::model::{Order, Product, StateTax};
use crate::service::FlooringService;
use crate::service::validator::{MIN_AREA, validate_customer_name};

use super::io::{UserIo, format_date, parse_amount};
use super::menu::MenuSelection;

/// Runs the menu loop against a [`FlooringService`].
pub struct Controller<P, T, U> {
    service: FlooringService<P, T>,
    io: U,
    today: NaiveDate,
}

impl<P, T, U> Controller<P, T, U>
where
    P: Catalog<Record = Product>,
    T: Catalog<Record = StateTax>,
    U: UserIo,
{
    pub fn new(service: FlooringService<P, T>, io: U) -> Self {
        Self {
            service,
            io,
            today: Local::now().date_naive(),
        }
    }

    /// Overrides the date new orders are checked against.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn into_io(self) -> U {
        self.io
    }

    /// Loops until the user quits or input runs out. Action failures are
    /// shown to the user; only console failures end the loop with an error.
    pub fn run(&mut self) -> Result<(), FlooringError> {
        loop {
            let selection = match self.prompt_menu() {
                Ok(selection) => selection,
                Err(FlooringError::InputClosed) => break,
                Err(e) => return Err(e),
            };
            debug!("menu selection: {}", selection);

            if selection == MenuSelection::Exit {
                self.header("Goodbye!")?;
                break;
            }

            if let Err(e) = self.dispatch(selection) {
                if e.kind() == ErrorKind::Input {
                    break;
                }
                warn!("{} failed: {}", selection, e);
                self.render_error(&e)?;
            }

            if self.io.read_line("Press enter to continue...")?.is_none() {
                break;
            }
        }
        info!("leaving menu loop");
        Ok(())
    }

    fn dispatch(&mut self, selection: MenuSelection) -> Result<(), FlooringError> {
        match selection {
            MenuSelection::DisplayOrders => self.display_orders(),
            MenuSelection::AddOrder => self.add_order(),
            MenuSelection::EditOrder => self.edit_order(),
            MenuSelection::RemoveOrder => self.remove_order(),
            MenuSelection::ExportAll => self.export_all(),
            MenuSelection::Exit => Ok(()),
        }
    }

    fn prompt_menu(&mut self) -> Result<MenuSelection, FlooringError> {
        self.header("Menu")?;
        for (idx, selection) in MenuSelection::ALL.iter().enumerate() {
            self.io.print(&format!("{}. {}", idx + 1, selection))?;
        }
        let last = MenuSelection::ALL.len() as u32;
        let choice = self
            .io
            .read_int(&format!("Please select an option 1 through {}", last), 1, last)?;
        MenuSelection::from_choice(choice)
            .ok_or_else(|| FlooringError::Validation(format!("no menu option {}", choice)))
    }

    fn display_orders(&mut self) -> Result<(), FlooringError> {
        self.header("Display Orders")?;
        let date = self.io.read_date("Enter the order date (MM/DD/YYYY).", None)?;
        let orders = self.service.orders_for_date(date)?;
        if orders.is_empty() {
            return self
                .io
                .print(&format!("There are no orders for {}.", format_date(date)));
        }
        self.header(&format!("Orders for {}", format_date(date)))?;
        for order in &orders {
            self.io.print(&order.to_string())?;
        }
        Ok(())
    }

    fn add_order(&mut self) -> Result<(), FlooringError> {
        self.header("Add an Order")?;
        let products = self.service.products()?;
        let taxes = self.service.state_taxes()?;

        let date = self.io.read_date(
            &format!(
                "Enter the order date (MM/DD/YYYY). It must be {} or later.",
                format_date(self.today)
            ),
            Some(self.today),
        )?;
        let name = self.prompt_customer_name(None)?;
        let state_tax = self.prompt_state_tax(&taxes, None)?;
        let product = self.prompt_product(&products, None)?;
        let area = self.io.read_decimal(
            &format!("Enter the area in sqft (XXXX.XX), at least {}.", MIN_AREA),
            MIN_AREA,
        )?;

        let draft = Order::builder()
            .date(date)
            .customer_name(name)
            .state_tax(state_tax)
            .product(product)
            .area(area)
            .build()?;
        self.service.validate_order(&draft)?;
        self.io.print(&draft.to_string())?;

        if !self.io.read_yes_no("Place this order?")? {
            return self.io.print("Order discarded.");
        }
        let added = self.service.add_order(&draft)?;
        self.io
            .print(&format!("{}\nThe above order has been added.", added))
    }

    fn edit_order(&mut self) -> Result<(), FlooringError> {
        self.header("Edit an Order")?;
        let current = self.prompt_existing_order()?;
        let products = self.service.products()?;
        let taxes = self.service.state_taxes()?;

        self.io.print("Leave a field blank to keep its current value.")?;
        let name = self.prompt_customer_name(Some(current.customer_name()))?;
        let state_tax = self.prompt_state_tax(&taxes, Some(current.state_tax()))?;
        let product = self.prompt_product(&products, Some(current.product()))?;
        let area = self.prompt_area_or_keep(current.area())?;

        let edited = current
            .with_customer_name(name)
            .with_state_tax(state_tax)
            .with_product(product)
            .with_area(area);
        let number = current.number().unwrap_or_default();
        if edited == current {
            return self
                .io
                .print(&format!("No changes were made to order #{}.", number));
        }

        self.service.validate_edit(&edited)?;
        self.io.print(&edited.to_string())?;
        if !self.io.read_yes_no("Save these changes?")? {
            return self.io.print("Changes discarded.");
        }
        self.service.edit_order(&edited)?;
        self.io
            .print(&format!("Order #{} has been updated.", number))
    }

    fn remove_order(&mut self) -> Result<(), FlooringError> {
        self.header("Remove an Order")?;
        let order = self.prompt_existing_order()?;
        self.io.print(&order.to_string())?;

        let number = order.number().unwrap_or_default();
        if !self.io.read_yes_no("Remove this order?")? {
            return self.io.print("Order kept.");
        }
        self.service.remove_order(order.date(), number)?;
        self.io.print(&format!("Order #{} has been removed.", number))
    }

    fn export_all(&mut self) -> Result<(), FlooringError> {
        self.header("Export All Data")?;
        let written = self.service.export_all()?;
        let path = self.service.export_path().display().to_string();
        self.io
            .print(&format!("Exported {} orders to {}.", written, path))
    }

    fn prompt_existing_order(&mut self) -> Result<Order, FlooringError> {
        let date = self.io.read_date("Enter the order date (MM/DD/YYYY).", None)?;
        let number = self.io.read_int("Enter the order number.", 1, u32::MAX)?;
        self.service.get_order(date, number)
    }

    fn prompt_customer_name(&mut self, current: Option<&str>) -> Result<String, FlooringError> {
        let prompt = match current {
            Some(name) => format!("Enter the customer name ({}).", name),
            None => "Enter the customer name.".to_string(),
        };
        loop {
            let raw = self.io.read_string(&prompt)?;
            if let Some(name) = current.filter(|_| raw.is_empty()) {
                return Ok(name.to_string());
            }
            match validate_customer_name(&raw) {
                Ok(()) => return Ok(raw),
                Err(e) => self.io.print(&e.to_string())?,
            }
        }
    }

    fn prompt_state_tax(
        &mut self,
        taxes: &[StateTax],
        current: Option<&StateTax>,
    ) -> Result<StateTax, FlooringError> {
        if taxes.is_empty() {
            return Err(FlooringError::Validation(
                "no states are available".to_string(),
            ));
        }
        self.header("Available States")?;
        for tax in taxes {
            self.io.print(&tax.to_string())?;
        }
        let prompt = match current {
            Some(tax) => format!("Enter a state abbreviation ({}).", tax.abbreviation),
            None => "Enter a state abbreviation.".to_string(),
        };
        loop {
            let raw = self.io.read_string(&prompt)?;
            if let Some(tax) = current.filter(|_| raw.is_empty()) {
                return Ok(tax.clone());
            }
            let raw = raw.trim();
            if let Some(tax) = taxes
                .iter()
                .find(|t| t.abbreviation.eq_ignore_ascii_case(raw))
            {
                return Ok(tax.clone());
            }
            self.io.print(&format!("'{}' is not an available state.", raw))?;
        }
    }

    fn prompt_product(
        &mut self,
        products: &[Product],
        current: Option<&Product>,
    ) -> Result<Product, FlooringError> {
        if products.is_empty() {
            return Err(FlooringError::Validation(
                "no products are available".to_string(),
            ));
        }
        self.header("Available Products")?;
        for product in products {
            self.io.print(&product.to_string())?;
        }
        let prompt = match current {
            Some(product) => format!("Enter a product type ({}).", product.product_type),
            None => "Enter a product type.".to_string(),
        };
        loop {
            let raw = self.io.read_string(&prompt)?;
            if let Some(product) = current.filter(|_| raw.is_empty()) {
                return Ok(product.clone());
            }
            let raw = raw.trim();
            if let Some(product) = products
                .iter()
                .find(|p| p.product_type.eq_ignore_ascii_case(raw))
            {
                return Ok(product.clone());
            }
            self.io
                .print(&format!("'{}' is not an available product.", raw))?;
        }
    }

    fn prompt_area_or_keep(&mut self, current: Decimal) -> Result<Decimal, FlooringError> {
        let prompt = format!("Enter the area in sqft ({}).", current);
        loop {
            let raw = self.io.read_string(&prompt)?;
            if raw.is_empty() {
                return Ok(current);
            }
            match parse_amount(&raw) {
                Some(area) if area >= MIN_AREA => return Ok(area),
                _ => self.io.print(&format!(
                    "Enter a value in XXXX.XX format, at least {}.",
                    MIN_AREA
                ))?,
            }
        }
    }

    fn render_error(&mut self, err: &FlooringError) -> Result<(), FlooringError> {
        let msg = match err {
            FlooringError::OrderNotFound { date, number } => format!(
                "Not found: there is no order #{} for {}.",
                number,
                format_date(*date)
            ),
            FlooringError::NoOrdersForDate { date } => {
                format!("Not found: there are no orders for {}.", format_date(*date))
            }
            e => match e.kind() {
                ErrorKind::NotFound => format!("Not found: {}", e),
                ErrorKind::Validation => e.to_string(),
                ErrorKind::Persistence | ErrorKind::Config => {
                    format!("Storage failure, the action was not completed.\n\t{}", e)
                }
                ErrorKind::Input => return Ok(()),
            },
        };
        self.io.print(&msg)
    }

    fn header(&mut self, title: &str) -> Result<(), FlooringError> {
        self.io.print(&format!("=== {} ===", title.to_uppercase()))
    }
}

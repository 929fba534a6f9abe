use anyhow::Result;
use clap::Args;
use dailymed_client::SplQuery;
use dailymed_client::dailymed::query::{DateComparison, NameType};

use super::{ClientOptions, OutputArgs, create_client, output_json, output_results};

/// Remote filters of the `spls` endpoint
#[derive(Args, Debug, Clone)]
pub struct SplQueryArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page (1-100)
    #[arg(long, default_value = "10")]
    pub pagesize: u32,

    /// Filter by drug name
    #[arg(long)]
    pub drug_name: Option<String>,

    /// Whether --drug-name is a generic or brand name
    #[arg(long, value_enum, requires = "drug_name")]
    pub name_type: Option<NameTypeArg>,

    /// Filter by NDC (product or package code)
    #[arg(long)]
    pub ndc: Option<String>,

    /// Filter by SET ID
    #[arg(long)]
    pub setid: Option<String>,

    /// Filter by labeler name
    #[arg(long)]
    pub labeler: Option<String>,

    /// Filter by manufacturer name
    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Filter by FDA application number (e.g. NDA020402)
    #[arg(long)]
    pub application_number: Option<String>,

    /// Only labels with (true) or without (false) a boxed warning
    #[arg(long)]
    pub boxed_warning: Option<bool>,

    /// Filter by DEA schedule code (e.g. CII)
    #[arg(long)]
    pub dea_schedule_code: Option<String>,

    /// Filter by document type code
    #[arg(long)]
    pub doctype: Option<String>,

    /// Filter by pharmacologic class code
    #[arg(long)]
    pub drug_class_code: Option<String>,

    /// Coding system of --drug-class-code
    #[arg(long)]
    pub drug_class_coding_system: Option<String>,

    /// Filter by marketing category code
    #[arg(long)]
    pub marketing_category_code: Option<String>,

    /// Filter by published date (YYYY-MM-DD)
    #[arg(long)]
    pub published_date: Option<String>,

    /// How --published-date is compared
    #[arg(long, value_enum, requires = "published_date")]
    pub published_date_comparison: Option<DateComparisonArg>,

    /// Filter by RxCUI
    #[arg(long)]
    pub rxcui: Option<String>,

    /// Filter by UNII code
    #[arg(long)]
    pub unii_code: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameTypeArg {
    Generic,
    Brand,
}

impl From<NameTypeArg> for NameType {
    fn from(arg: NameTypeArg) -> Self {
        match arg {
            NameTypeArg::Generic => NameType::Generic,
            NameTypeArg::Brand => NameType::Brand,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DateComparisonArg {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

impl From<DateComparisonArg> for DateComparison {
    fn from(arg: DateComparisonArg) -> Self {
        match arg {
            DateComparisonArg::Lt => DateComparison::Lt,
            DateComparisonArg::Lte => DateComparison::Lte,
            DateComparisonArg::Gt => DateComparison::Gt,
            DateComparisonArg::Gte => DateComparison::Gte,
            DateComparisonArg::Eq => DateComparison::Eq,
        }
    }
}

impl SplQueryArgs {
    pub fn to_query(&self) -> Result<SplQuery> {
        let mut query = SplQuery::new().page(self.page).pagesize(self.pagesize);

        if let Some(ref drug_name) = self.drug_name {
            query = query.drug_name(drug_name);
        }
        if let Some(name_type) = self.name_type {
            query = query.name_type(name_type.into());
        }
        if let Some(ref ndc) = self.ndc {
            query = query.ndc(ndc);
        }
        if let Some(ref setid) = self.setid {
            query = query.setid(setid);
        }
        if let Some(ref labeler) = self.labeler {
            query = query.labeler(labeler);
        }
        if let Some(ref manufacturer) = self.manufacturer {
            query = query.manufacturer(manufacturer);
        }
        if let Some(ref application_number) = self.application_number {
            query = query.application_number(application_number);
        }
        if let Some(boxed_warning) = self.boxed_warning {
            query = query.boxed_warning(boxed_warning);
        }
        if let Some(ref code) = self.dea_schedule_code {
            query = query.dea_schedule_code(code);
        }
        if let Some(ref doctype) = self.doctype {
            query = query.doctype(doctype);
        }
        if let Some(ref code) = self.drug_class_code {
            query = query.drug_class_code(code);
        }
        if let Some(ref system) = self.drug_class_coding_system {
            query = query.drug_class_coding_system(system);
        }
        if let Some(ref code) = self.marketing_category_code {
            query = query.marketing_category_code(code);
        }
        if let Some(ref date) = self.published_date {
            query = query.published_date(date);
        }
        if let Some(comparison) = self.published_date_comparison {
            query = query.published_date_comparison(comparison.into());
        }
        if let Some(ref rxcui) = self.rxcui {
            query = query.rxcui(rxcui);
        }
        if let Some(ref unii_code) = self.unii_code {
            query = query.unii_code(unii_code);
        }

        query.validate()?;
        Ok(query)
    }
}

#[derive(Args, Debug)]
pub struct SearchSpls {
    #[command(flatten)]
    pub query: SplQueryArgs,

    /// Show only SET IDs (one per line)
    #[arg(long)]
    pub ids_only: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl SearchSpls {
    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let query = self.query.to_query()?;

        let page = client.search_spls(&query).await?;
        if page.malformed_rows > 0 {
            tracing::warn!(
                malformed_rows = page.malformed_rows,
                "Some search rows were skipped"
            );
        }

        if self.ids_only {
            let ids: Vec<&str> = page.set_ids().collect();
            output_results(&ids.join("\n"), self.output.path()).await
        } else {
            output_json(&page, self.output.path()).await
        }
    }
}

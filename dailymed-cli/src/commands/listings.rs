use anyhow::Result;
use clap::Args;
use dailymed_client::{DrugClassQuery, DrugNameQuery, NdcQuery, RxcuiQuery, UniiQuery};

use super::search::NameTypeArg;
use super::{ClientOptions, OutputArgs, create_client, output_json};

/// Pagination flags shared by the listing commands
#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Results per page (1-100)
    #[arg(long, default_value = "10")]
    pub pagesize: u32,
}

#[derive(Args, Debug)]
pub struct GetDrugNames {
    /// Filter by manufacturer name
    #[arg(long)]
    pub manufacturer: Option<String>,

    /// Only generic or only brand names
    #[arg(long, value_enum)]
    pub name_type: Option<NameTypeArg>,

    #[command(flatten)]
    pub paging: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetDrugNames {
    fn to_query(&self) -> DrugNameQuery {
        let mut query = DrugNameQuery::new()
            .page(self.paging.page)
            .pagesize(self.paging.pagesize);
        if let Some(ref manufacturer) = self.manufacturer {
            query = query.manufacturer(manufacturer);
        }
        if let Some(name_type) = self.name_type {
            query = query.name_type(name_type.into());
        }
        query
    }

    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let page = client.get_drug_names(&self.to_query()).await?;
        output_json(&page, self.output.path()).await
    }
}

#[derive(Args, Debug)]
pub struct GetNdcs {
    /// Filter by FDA application number
    #[arg(long)]
    pub application_number: Option<String>,

    /// Filter by labeler name
    #[arg(long)]
    pub labeler: Option<String>,

    /// Filter by marketing category code
    #[arg(long)]
    pub marketing_category_code: Option<String>,

    /// Only NDCs of this SET ID
    #[arg(long)]
    pub setid: Option<String>,

    #[command(flatten)]
    pub paging: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetNdcs {
    fn to_query(&self) -> NdcQuery {
        let mut query = NdcQuery::new()
            .page(self.paging.page)
            .pagesize(self.paging.pagesize);
        if let Some(ref value) = self.application_number {
            query = query.application_number(value);
        }
        if let Some(ref value) = self.labeler {
            query = query.labeler(value);
        }
        if let Some(ref value) = self.marketing_category_code {
            query = query.marketing_category_code(value);
        }
        if let Some(ref value) = self.setid {
            query = query.setid(value);
        }
        query
    }

    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let page = client.get_ndcs(&self.to_query()).await?;
        output_json(&page, self.output.path()).await
    }
}

#[derive(Args, Debug)]
pub struct GetDrugClasses {
    /// Filter by class code
    #[arg(long)]
    pub drug_class_code: Option<String>,

    /// Coding system of --drug-class-code
    #[arg(long)]
    pub drug_class_coding_system: Option<String>,

    /// Class type (e.g. EPC, MOA, PE, CS)
    #[arg(long)]
    pub class_code_type: Option<String>,

    /// Filter by class name
    #[arg(long)]
    pub class_name: Option<String>,

    /// Filter by UNII code
    #[arg(long)]
    pub unii_code: Option<String>,

    #[command(flatten)]
    pub paging: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetDrugClasses {
    fn to_query(&self) -> DrugClassQuery {
        let mut query = DrugClassQuery::new()
            .page(self.paging.page)
            .pagesize(self.paging.pagesize);
        if let Some(ref value) = self.drug_class_code {
            query = query.drug_class_code(value);
        }
        if let Some(ref value) = self.drug_class_coding_system {
            query = query.drug_class_coding_system(value);
        }
        if let Some(ref value) = self.class_code_type {
            query = query.class_code_type(value);
        }
        if let Some(ref value) = self.class_name {
            query = query.class_name(value);
        }
        if let Some(ref value) = self.unii_code {
            query = query.unii_code(value);
        }
        query
    }

    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let page = client.get_drug_classes(&self.to_query()).await?;
        output_json(&page, self.output.path()).await
    }
}

#[derive(Args, Debug)]
pub struct GetUniis {
    /// Filter by active moiety
    #[arg(long)]
    pub active_moiety: Option<String>,

    /// Filter by pharmacologic class code
    #[arg(long)]
    pub drug_class_code: Option<String>,

    /// Coding system of --drug-class-code
    #[arg(long)]
    pub drug_class_coding_system: Option<String>,

    /// Filter by RxCUI
    #[arg(long)]
    pub rxcui: Option<String>,

    /// Filter by UNII code
    #[arg(long)]
    pub unii_code: Option<String>,

    #[command(flatten)]
    pub paging: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetUniis {
    fn to_query(&self) -> UniiQuery {
        let mut query = UniiQuery::new()
            .page(self.paging.page)
            .pagesize(self.paging.pagesize);
        if let Some(ref value) = self.active_moiety {
            query = query.active_moiety(value);
        }
        if let Some(ref value) = self.drug_class_code {
            query = query.drug_class_code(value);
        }
        if let Some(ref value) = self.drug_class_coding_system {
            query = query.drug_class_coding_system(value);
        }
        if let Some(ref value) = self.rxcui {
            query = query.rxcui(value);
        }
        if let Some(ref value) = self.unii_code {
            query = query.unii_code(value);
        }
        query
    }

    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let page = client.get_uniis(&self.to_query()).await?;
        output_json(&page, self.output.path()).await
    }
}

#[derive(Args, Debug)]
pub struct GetRxcuis {
    /// Filter by RxCUI
    #[arg(long)]
    pub rxcui: Option<String>,

    /// Filter by concept name
    #[arg(long)]
    pub rxstring: Option<String>,

    /// Filter by term type (e.g. IN, SCD, SBD)
    #[arg(long)]
    pub rxtty: Option<String>,

    #[command(flatten)]
    pub paging: PageArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetRxcuis {
    fn to_query(&self) -> RxcuiQuery {
        let mut query = RxcuiQuery::new()
            .page(self.paging.page)
            .pagesize(self.paging.pagesize);
        if let Some(ref value) = self.rxcui {
            query = query.rxcui(value);
        }
        if let Some(ref value) = self.rxstring {
            query = query.rxstring(value);
        }
        if let Some(ref value) = self.rxtty {
            query = query.rxtty(value);
        }
        query
    }

    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let client = create_client(options)?;
        let page = client.lookup_rxcuis(&self.to_query()).await?;
        output_json(&page, self.output.path()).await
    }
}

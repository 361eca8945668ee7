use crate::core::domain::Configuration;
use crate::gateway::factory::CatalogHandles;
use crate::loans::domain::LoanService;
use crate::loans::domain::service::LoanServiceImpl;

pub fn create_loan_service(config: &Configuration, handles: &CatalogHandles) -> Box<dyn LoanService> {
    Box::new(LoanServiceImpl::new(config, handles.books.clone(), handles.copies.clone(),
                                  handles.members.clone(), handles.loans.clone()))
}

use crate::copies::domain::model::CopyEntity;
use crate::core::repository::Repository;

pub trait CopyRepository: Repository<CopyEntity> {}

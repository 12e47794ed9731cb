//! Employee endpoints

use crate::models::{Employee, UpdateEmployee};

use super::{ApiClient, ApiResult};

impl ApiClient {
    pub(super) async fn employees(&self) -> ApiResult<Vec<Employee>> {
        let employees: Vec<Employee> = self.get_data(&["employee"]).await?;
        tracing::debug!(count = employees.len(), "Fetched employees");
        Ok(employees)
    }

    pub(super) async fn add_employee(&self, employee: &Employee) -> ApiResult<()> {
        let url = self.endpoint(&["createemployee"])?;
        self.send_empty(self.http.post(url).json(employee))
            .await
            .inspect_err(|e| tracing::error!(error = %e, nik = %employee.nik, "Failed to create employee"))
    }

    pub(super) async fn employee_for_edit(&self, nik: &str) -> ApiResult<Employee> {
        self.get_data(&["edit", nik])
            .await
            .inspect_err(|e| tracing::error!(error = %e, nik, "Failed to fetch employee for editing"))
    }

    /// Only phone, department and email can change
    pub(super) async fn edit_employee(&self, nik: &str, data: &UpdateEmployee) -> ApiResult<()> {
        let url = self.endpoint(&["update", nik])?;
        self.send_empty(self.http.put(url).json(data))
            .await
            .inspect_err(|e| tracing::error!(error = %e, nik, "Failed to update employee"))
    }

    pub(super) async fn remove_employee(&self, nik: &str) -> ApiResult<()> {
        let url = self.endpoint(&["delete", nik])?;
        self.send_empty(self.http.delete(url))
            .await
            .inspect_err(|e| tracing::error!(error = %e, nik, "Failed to delete employee"))
    }
}
